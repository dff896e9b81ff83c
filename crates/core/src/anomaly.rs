//! Anomaly records produced by detection.
//!
//! Anomalies are plain values: the engine builds them once and hands the
//! ordered list to the caller.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;
use crate::model::Section;

/// Kind of deviation, rendered on the wire as `UNKNOWN_ENDPOINT`,
/// `MISSING_<SECTION>` or `TYPE_MISMATCH_<SECTION>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnomalyType {
    UnknownEndpoint,
    Missing(Section),
    TypeMismatch(Section),
}

impl fmt::Display for AnomalyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnomalyType::UnknownEndpoint => f.write_str("UNKNOWN_ENDPOINT"),
            AnomalyType::Missing(section) => write!(f, "MISSING_{}", section),
            AnomalyType::TypeMismatch(section) => write!(f, "TYPE_MISMATCH_{}", section),
        }
    }
}

impl FromStr for AnomalyType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "UNKNOWN_ENDPOINT" {
            return Ok(AnomalyType::UnknownEndpoint);
        }
        let unknown = || CoreError::UnknownAnomalyType(s.to_string());
        if let Some(section) = s.strip_prefix("MISSING_") {
            return section.parse().map(AnomalyType::Missing).map_err(|_| unknown());
        }
        if let Some(section) = s.strip_prefix("TYPE_MISMATCH_") {
            return section.parse().map(AnomalyType::TypeMismatch).map_err(|_| unknown());
        }
        Err(unknown())
    }
}

impl Serialize for AnomalyType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AnomalyType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A detected deviation between a request and its learned model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anomaly {
    #[serde(rename = "type")]
    pub anomaly_type: AnomalyType,
    pub description: String,
}

impl Anomaly {
    pub fn unknown_endpoint() -> Self {
        Self {
            anomaly_type: AnomalyType::UnknownEndpoint,
            description: "Endpoint not found in learned models".to_string(),
        }
    }

    pub fn missing(section: Section, name: &str) -> Self {
        Self {
            anomaly_type: AnomalyType::Missing(section),
            description: format!("Required field '{}' is missing in {}", name, section),
        }
    }

    pub fn type_mismatch(section: Section, name: &str, value: &str, allowed: &[String]) -> Self {
        Self {
            anomaly_type: AnomalyType::TypeMismatch(section),
            description: format!(
                "{} parameter '{}' has value '{}' which does not match any allowed types: [{}]",
                section,
                name,
                value,
                allowed.join(", ")
            ),
        }
    }
}
