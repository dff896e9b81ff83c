use thiserror::Error;

use shadowscan_storage::StorageError;

use crate::validation::ValidationResult;

/// Why an ingestion batch was rejected. Nothing is stored on any error.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Received list size: 0")]
    EmptyModelList,

    #[error("Batch size {size} exceeds the maximum allowed limit of {limit}")]
    ModelListTooLarge { size: usize, limit: usize },

    #[error("{}", .0.summary())]
    InvalidModelSyntax(ValidationResult),

    #[error("failed to store models: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum DetectError {
    #[error("{}", .0.summary())]
    InvalidRequest(ValidationResult),

    /// Schema lookup failed and the service is configured to fail closed.
    #[error("schema lookup unavailable: {0}")]
    Unavailable(#[from] StorageError),
}
