//! Structural validation for ingested models and detection requests.
//!
//! Checks never stop at the first problem: every violation is recorded in a
//! [`ValidationResult`] with a path such as `models[2].headers[0].types`, so
//! a caller can report the whole batch in one response. Errors block the
//! operation; warnings are advisory.

mod fuzzy;
mod model_checks;
mod request_checks;

use serde::{Deserialize, Serialize};

use shadowscan_core::config::IngestConfig;
use shadowscan_core::{DetectionRequest, LearnedModel};

// ── Result types ────────────────────────────────────────────────────

/// Overall validation outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// A blocking validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Location of the offending field, e.g. `"models[0].method"`.
    pub path: String,
    pub message: String,
    /// Optional "Did you mean …?" suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// A non-blocking advisory warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationResult {
    pub(crate) fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: None,
        });
    }

    pub(crate) fn error_with_suggestion(
        &mut self,
        path: impl Into<String>,
        message: impl Into<String>,
        suggestion: Option<&str>,
    ) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: suggestion.map(|s| format!("did you mean '{}'?", s)),
        });
    }

    pub(crate) fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            path: path.into(),
            message: message.into(),
        });
    }

    /// All errors as one line, `path: message` joined by `", "`.
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| match &e.suggestion {
                Some(hint) => format!("{}: {} ({})", e.path, e.message, hint),
                None => format!("{}: {}", e.path, e.message),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ── Public API ──────────────────────────────────────────────────────

/// Validate every model of an ingestion batch against `limits`.
///
/// Batch-size limits are not checked here; see
/// [`IngestionService::ingest`](crate::ingest::IngestionService::ingest).
pub fn validate_models(models: &[LearnedModel], limits: &IngestConfig) -> ValidationResult {
    let mut result = ValidationResult::new();
    for (index, model) in models.iter().enumerate() {
        model_checks::validate_model(model, index, limits, &mut result);
    }
    model_checks::warn_duplicates(models, &mut result);
    result
}

/// Validate the identity fields of a detection request.
pub fn validate_request(request: &DetectionRequest) -> ValidationResult {
    let mut result = ValidationResult::new();
    request_checks::validate_request(request, &mut result);
    result
}
