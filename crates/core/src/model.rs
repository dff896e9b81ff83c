use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::CoreError;

/// One of the three independently checked areas of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    QueryParam,
    Header,
    Body,
}

impl Section {
    /// Evaluation order used by the anomaly engine.
    pub const ALL: [Section; 3] = [Section::QueryParam, Section::Header, Section::Body];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::QueryParam => "QUERY_PARAM",
            Section::Header => "HEADER",
            Section::Body => "BODY",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "QUERY_PARAM" => Ok(Section::QueryParam),
            "HEADER" => Ok(Section::Header),
            "BODY" => Ok(Section::Body),
            other => Err(CoreError::UnknownSection(other.to_string())),
        }
    }
}

// ── Learned models ────────────────────────────────────────────

/// Expected shape of a single named parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Allowed type tags, OR-combined at detection time.
    #[serde(default, deserialize_with = "null_as_default")]
    pub types: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub required: bool,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, types: &[&str], required: bool) -> Self {
        Self {
            name: name.into(),
            types: types.iter().map(|t| t.to_string()).collect(),
            required,
        }
    }
}

/// The learned schema for one method + path.
///
/// Stored models are never mutated; ingestion replaces the whole record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnedModel {
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub method: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub query_params: Vec<ParamSpec>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: Vec<ParamSpec>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: Vec<ParamSpec>,
}

impl LearnedModel {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
            query_params: Vec::new(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn with_query_param(mut self, param: ParamSpec) -> Self {
        self.query_params.push(param);
        self
    }

    pub fn with_header(mut self, param: ParamSpec) -> Self {
        self.headers.push(param);
        self
    }

    pub fn with_body(mut self, param: ParamSpec) -> Self {
        self.body.push(param);
        self
    }

    pub fn key(&self) -> SchemaKey {
        SchemaKey::new(&self.method, &self.path)
    }

    pub fn params(&self, section: Section) -> &[ParamSpec] {
        match section {
            Section::QueryParam => &self.query_params,
            Section::Header => &self.headers,
            Section::Body => &self.body,
        }
    }
}

/// Lookup identity of a learned model: `METHOD:PATH`.
///
/// The method is trimmed and uppercased; the path is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaKey(String);

impl SchemaKey {
    pub fn new(method: &str, path: &str) -> Self {
        Self(format!("{}:{}", method.trim().to_uppercase(), path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Detection requests ────────────────────────────────────────

/// A decoded live request to be checked against its learned model.
///
/// Each section accepts either a JSON object or a list of
/// `{"name": ..., "value": ...}` pairs. Query and header values may be JSON
/// strings, numbers or booleans; a null value counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub method: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,
    #[serde(default, deserialize_with = "scalar_map_or_pairs")]
    pub query_params: HashMap<String, String>,
    #[serde(default, deserialize_with = "scalar_map_or_pairs")]
    pub headers: HashMap<String, String>,
    #[serde(default, deserialize_with = "map_or_pairs")]
    pub body: HashMap<String, Value>,
}

impl DetectionRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(name.into(), value.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(name.into(), value.into());
        self
    }

    pub fn key(&self) -> SchemaKey {
        SchemaKey::new(&self.method, &self.path)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MapOrPairs<V> {
    Map(HashMap<String, V>),
    Pairs(Vec<NamedValue<V>>),
}

#[derive(Deserialize)]
struct NamedValue<V> {
    name: String,
    value: V,
}

fn map_or_pairs<'de, D, V>(deserializer: D) -> Result<HashMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    Ok(match Option::<MapOrPairs<V>>::deserialize(deserializer)? {
        None => HashMap::new(),
        Some(MapOrPairs::Map(map)) => map,
        Some(MapOrPairs::Pairs(pairs)) => pairs.into_iter().map(|p| (p.name, p.value)).collect(),
    })
}

/// Like [`map_or_pairs`], flattening scalar values to their text.
fn scalar_map_or_pairs<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut text = HashMap::new();
    for (name, value) in map_or_pairs::<D, Value>(deserializer)? {
        let rendered = match value {
            Value::Null => continue,
            Value::String(s) => s,
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Array(_) | Value::Object(_) => {
                return Err(D::Error::custom(format!(
                    "value of '{}' must be a string, number or boolean",
                    name
                )))
            }
        };
        text.insert(name, rendered);
    }
    Ok(text)
}

/// Treat an explicit `null` like a missing field so validation can report it.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_key_uppercases_and_trims_method() {
        assert_eq!(SchemaKey::new("post", "/api/login").as_str(), "POST:/api/login");
        assert_eq!(SchemaKey::new(" Get ", "/x").as_str(), "GET:/x");
        assert_eq!(SchemaKey::new("GET", "/Api/Case").as_str(), "GET:/Api/Case");
    }

    #[test]
    fn model_key_matches_request_key() {
        let model = LearnedModel::new("delete", "/api/users");
        let request = DetectionRequest::new("DELETE", "/api/users");
        assert_eq!(model.key(), request.key());
    }

    #[test]
    fn model_decodes_with_absent_sections() {
        let model: LearnedModel = serde_json::from_str(
            r#"{"path": "/api/login", "method": "POST",
                "body": [{"name": "username", "types": ["String"], "required": true}]}"#,
        )
        .unwrap();
        assert!(model.query_params.is_empty());
        assert!(model.headers.is_empty());
        assert_eq!(model.body, vec![ParamSpec::new("username", &["String"], true)]);
    }

    #[test]
    fn request_sections_accept_maps() {
        let request: DetectionRequest = serde_json::from_str(
            r#"{"method": "POST", "path": "/api/payment",
                "query_params": {"amount": "500"},
                "body": {"is_admin": true}}"#,
        )
        .unwrap();
        assert_eq!(request.query_params.get("amount").map(String::as_str), Some("500"));
        assert_eq!(request.body.get("is_admin"), Some(&Value::Bool(true)));
        assert!(request.headers.is_empty());
    }

    #[test]
    fn request_sections_accept_name_value_pairs() {
        let request: DetectionRequest = serde_json::from_str(
            r#"{"method": "POST", "path": "/api/payment",
                "headers": [{"name": "X-Auth-Token", "value": "Bearer abc"}],
                "body": [{"name": "count", "value": 3}]}"#,
        )
        .unwrap();
        assert_eq!(
            request.headers.get("X-Auth-Token").map(String::as_str),
            Some("Bearer abc")
        );
        assert_eq!(request.body.get("count"), Some(&Value::from(3)));
    }

    #[test]
    fn null_model_fields_decode_as_empty() {
        let model: LearnedModel = serde_json::from_str(
            r#"{"method": null, "path": null, "headers": null,
                "query_params": [{"name": null, "types": null, "required": null}]}"#,
        )
        .unwrap();
        assert!(model.method.is_empty());
        assert!(model.path.is_empty());
        assert!(model.headers.is_empty());
        assert_eq!(model.query_params, vec![ParamSpec::new("", &[], false)]);
    }

    #[test]
    fn scalar_query_and_header_values_become_text() {
        let request: DetectionRequest = serde_json::from_str(
            r#"{"method": "POST", "path": "/api/payment",
                "query_params": {"amount": 500, "ratio": -1.5, "skip": null},
                "headers": [{"name": "X-Debug", "value": true}]}"#,
        )
        .unwrap();
        assert_eq!(request.query_params.get("amount").map(String::as_str), Some("500"));
        assert_eq!(request.query_params.get("ratio").map(String::as_str), Some("-1.5"));
        assert!(!request.query_params.contains_key("skip"));
        assert_eq!(request.headers.get("X-Debug").map(String::as_str), Some("true"));
    }

    #[test]
    fn nested_query_values_are_rejected() {
        let result = serde_json::from_str::<DetectionRequest>(
            r#"{"method": "GET", "path": "/", "query_params": {"ids": [1, 2]}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn request_sections_accept_null() {
        let request: DetectionRequest =
            serde_json::from_str(r#"{"method": null, "path": "/", "headers": null}"#).unwrap();
        assert!(request.method.is_empty());
        assert!(request.headers.is_empty());
    }

    #[test]
    fn section_round_trips_through_str() {
        for section in Section::ALL {
            assert_eq!(section.as_str().parse::<Section>(), Ok(section));
        }
        assert!("COOKIE".parse::<Section>().is_err());
    }
}
