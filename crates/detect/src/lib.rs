//! Detection and ingestion for learned API schemas.
//!
//! [`DetectionService`] resolves a request's `METHOD:PATH` through the schema
//! cache and runs the anomaly engine; [`IngestionService`] validates model
//! batches, stores them and invalidates stale cache entries.

pub mod engine;
pub mod error;
pub mod ingest;
pub mod service;
pub mod validation;

pub use engine::detect_anomalies;
pub use error::{DetectError, IngestError};
pub use ingest::{IngestSummary, IngestionService};
pub use service::DetectionService;
pub use validation::{validate_models, validate_request, ValidationResult};
