use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

/// Parse a profiled env var, keeping `default` when unset or unparsable.
fn profiled_env_parse<T: FromStr>(profile: &str, key: &str, default: T) -> T {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_bool(profile: &str, key: &str, default: bool) -> bool {
    match profiled_env_opt(profile, key).map(|v| v.to_ascii_lowercase()) {
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => true,
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub server: ServerConfig,
    pub ingest: IngestConfig,
    pub cache: CacheConfig,
    pub detection: DetectionConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `SHADOWSCAN_PROFILE` env var. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("SHADOWSCAN_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            server: ServerConfig::from_env_profiled(p),
            ingest: IngestConfig::from_env_profiled(p),
            cache: CacheConfig::from_env_profiled(p),
            detection: DetectionConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  server:    {}:{}", self.server.host, self.server.port);
        tracing::info!(
            "  ingest:    max_models={}, max_params={}, max_types={}, max_len={}",
            self.ingest.max_models_per_request,
            self.ingest.max_params,
            self.ingest.max_param_types,
            self.ingest.max_string_length
        );
        tracing::info!(
            "  cache:     max_entries={}, ttl_ms={}",
            self.cache.max_entries,
            self.cache.ttl_ms
        );
        tracing::info!("  detection: fail_open={}", self.detection.fail_open);
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
}

impl ServerConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            host: profiled_env_or(p, "HOST", "0.0.0.0"),
            port: profiled_env_parse(p, "PORT", 8080),
            cors_origin: profiled_env_or(p, "CORS_ORIGIN", "*"),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origin: "*".to_string(),
        }
    }
}

// ── Ingestion limits ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Largest accepted model batch.
    pub max_models_per_request: usize,
    /// Parameters allowed per section of one model.
    pub max_params: usize,
    /// Type tags allowed per parameter.
    pub max_param_types: usize,
    /// Applies to paths and parameter names.
    pub max_string_length: usize,
}

impl IngestConfig {
    fn from_env_profiled(p: &str) -> Self {
        let d = Self::default();
        Self {
            max_models_per_request: profiled_env_parse(
                p,
                "MAX_MODELS_PER_REQUEST",
                d.max_models_per_request,
            ),
            max_params: profiled_env_parse(p, "MAX_API_PARAMS", d.max_params),
            max_param_types: profiled_env_parse(p, "MAX_API_PARAM_TYPES", d.max_param_types),
            max_string_length: profiled_env_parse(p, "MAX_STRING_LENGTH", d.max_string_length),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_models_per_request: 1000,
            max_params: 50,
            max_param_types: 8,
            max_string_length: 255,
        }
    }
}

// ── Schema cache ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub max_entries: usize,
    /// Sliding expiry measured from last access.
    pub ttl_ms: u64,
}

impl CacheConfig {
    fn from_env_profiled(p: &str) -> Self {
        let d = Self::default();
        Self {
            max_entries: profiled_env_parse(p, "CACHE_MAX_ENTRIES", d.max_entries),
            ttl_ms: profiled_env_parse(p, "CACHE_TTL_MS", d.ttl_ms),
        }
    }

    pub fn ttl(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.ttl_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl_ms: 600_000,
        }
    }
}

// ── Detection ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// When the schema lookup faults, answer with no anomalies instead of an error.
    pub fail_open: bool,
}

impl DetectionConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            fail_open: profiled_env_bool(p, "DETECTION_FAIL_OPEN", true),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self { fail_open: true }
    }
}
