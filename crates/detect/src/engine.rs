//! The anomaly engine: compare one request against its learned model.
//!
//! Sections are evaluated in [`Section::ALL`] order and parameters in the
//! order the model declares them, so the output order is stable. Fields the
//! model does not declare are ignored.

use std::borrow::Cow;

use serde_json::Value;

use shadowscan_core::{Anomaly, DetectionRequest, LearnedModel, ParamSpec, Section};
use shadowscan_typecheck::validate_any;

pub fn detect_anomalies(request: &DetectionRequest, model: &LearnedModel) -> Vec<Anomaly> {
    let mut anomalies = Vec::new();
    for section in Section::ALL {
        for spec in model.params(section) {
            let observed = observed_value(request, section, &spec.name);
            check_param(section, spec, observed.as_deref(), &mut anomalies);
        }
    }
    anomalies
}

fn check_param(section: Section, spec: &ParamSpec, observed: Option<&str>, out: &mut Vec<Anomaly>) {
    match observed {
        None if spec.required => out.push(Anomaly::missing(section, &spec.name)),
        None => {}
        Some(value) if !validate_any(value, &spec.types) => {
            out.push(Anomaly::type_mismatch(section, &spec.name, value, &spec.types));
        }
        Some(_) => {}
    }
}

fn observed_value<'a>(request: &'a DetectionRequest, section: Section, name: &str) -> Option<Cow<'a, str>> {
    match section {
        Section::QueryParam => request.query_params.get(name).map(|v| Cow::Borrowed(v.as_str())),
        Section::Header => request.headers.get(name).map(|v| Cow::Borrowed(v.as_str())),
        Section::Body => request.body.get(name).and_then(render_value),
    }
}

// ── Body value rendering ──────────────────────────────────────

/// Raw text a body value is type-checked as. `null` counts as absent.
///
/// Strings render as their contents, scalars as their JSON text. Arrays and
/// objects render in the list grammar (`[1, "a"]`, `{"k"=v}`) so that a JSON
/// array can satisfy the `List` tag.
pub fn render_value(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Bool(_) | Value::Number(_) => Some(Cow::Owned(value.to_string())),
        Value::Array(_) | Value::Object(_) => {
            let mut out = String::new();
            write_nested(value, &mut out);
            Some(Cow::Owned(out))
        }
    }
}

fn write_nested(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(_) | Value::Number(_) => out.push_str(&value.to_string()),
        Value::String(s) => write_quoted(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_nested(item, out);
            }
            out.push(']');
        }
        Value::Object(fields) => {
            out.push('{');
            for (i, (key, item)) in fields.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_quoted(key, out);
                out.push('=');
                write_nested(item, out);
            }
            out.push('}');
        }
    }
}

fn write_quoted(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
}
