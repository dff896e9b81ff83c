//! Per-model checks: path, method, and each parameter section.

use std::collections::HashMap;

use shadowscan_core::config::IngestConfig;
use shadowscan_core::{LearnedModel, ParamSpec, SchemaKey};
use shadowscan_typecheck::{is_supported, TypeTag};

use super::fuzzy::fuzzy_match;
use super::ValidationResult;

pub(crate) const ALLOWED_METHODS: [&str; 7] =
    ["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"];

fn has_text(s: &str) -> bool {
    !s.trim().is_empty()
}

fn too_long(s: &str, limit: usize) -> bool {
    s.chars().count() > limit
}

// ── Model ───────────────────────────────────────────────────────────

pub(super) fn validate_model(
    model: &LearnedModel,
    index: usize,
    limits: &IngestConfig,
    result: &mut ValidationResult,
) {
    let base = format!("models[{}]", index);

    if !has_text(&model.path) {
        result.error(format!("{}.path", base), "path is required");
    } else if too_long(&model.path, limits.max_string_length) {
        result.error(
            format!("{}.path", base),
            format!("path exceeds maximum length of {}", limits.max_string_length),
        );
    }

    validate_method(&model.method, &base, result);

    validate_params(&model.body, &format!("{}.body", base), limits, result);
    validate_params(&model.headers, &format!("{}.headers", base), limits, result);
    validate_params(&model.query_params, &format!("{}.query_params", base), limits, result);
}

fn validate_method(method: &str, base: &str, result: &mut ValidationResult) {
    let path = format!("{}.method", base);
    if !has_text(method) {
        result.error(path, "method is required");
        return;
    }

    let normalized = method.trim().to_uppercase();
    if !ALLOWED_METHODS.contains(&normalized.as_str()) {
        result.error_with_suggestion(
            path,
            format!(
                "unsupported HTTP method '{}', expected one of {}",
                method,
                ALLOWED_METHODS.join(" ")
            ),
            fuzzy_match(&normalized, &ALLOWED_METHODS),
        );
    }
}

// ── Parameters ──────────────────────────────────────────────────────

fn validate_params(
    params: &[ParamSpec],
    section_path: &str,
    limits: &IngestConfig,
    result: &mut ValidationResult,
) {
    if params.len() > limits.max_params {
        result.error(
            section_path,
            format!(
                "too many parameters: {} (max {})",
                params.len(),
                limits.max_params
            ),
        );
    }

    for (i, param) in params.iter().enumerate() {
        let param_path = format!("{}[{}]", section_path, i);

        if !has_text(&param.name) {
            result.error(format!("{}.name", param_path), "name is required");
        } else if too_long(&param.name, limits.max_string_length) {
            result.error(
                format!("{}.name", param_path),
                format!("name exceeds maximum length of {}", limits.max_string_length),
            );
        }

        validate_types(&param.types, &format!("{}.types", param_path), limits, result);
    }
}

fn validate_types(
    types: &[String],
    types_path: &str,
    limits: &IngestConfig,
    result: &mut ValidationResult,
) {
    if types.is_empty() {
        result.error(types_path, "at least one type is required");
        return;
    }

    if types.len() > limits.max_param_types {
        result.error(
            types_path,
            format!(
                "too many types: {} (max {})",
                types.len(),
                limits.max_param_types
            ),
        );
    }

    let names = TypeTag::ALL.map(|tag| tag.name());
    for name in types.iter().filter(|name| !is_supported(name)) {
        result.error_with_suggestion(
            types_path,
            format!("type '{}' is not supported", name),
            fuzzy_match(name, &names),
        );
    }
}

// ── Batch ───────────────────────────────────────────────────────────

/// Duplicate keys are legal; only the first occurrence is stored.
pub(super) fn warn_duplicates(models: &[LearnedModel], result: &mut ValidationResult) {
    let mut first_seen: HashMap<SchemaKey, usize> = HashMap::new();
    for (index, model) in models.iter().enumerate() {
        let key = model.key();
        match first_seen.get(&key) {
            Some(first) => result.warn(
                format!("models[{}]", index),
                format!(
                    "duplicate of models[{}] ({}), only the first occurrence is kept",
                    first, key
                ),
            ),
            None => {
                first_seen.insert(key, index);
            }
        }
    }
}
