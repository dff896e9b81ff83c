use thiserror::Error;

/// Failures surfaced by a schema store or the cache in front of it.
///
/// Cloneable so one failed load can be handed to every caller waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("schema load for '{0}' was abandoned")]
    LoadAbandoned(String),

    #[error("{0}")]
    Other(String),
}
