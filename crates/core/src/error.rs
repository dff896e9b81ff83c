use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown section: {0}")]
    UnknownSection(String),

    #[error("unknown anomaly type: {0}")]
    UnknownAnomalyType(String),
}
