//! Learned-model storage.
//!
//! - [`MemorySchemaStore`]: process-lifetime concurrent map keyed by `METHOD:PATH`
//! - [`SchemaCache`]: bounded, sliding-TTL, read-through cache with per-key
//!   load coalescing and explicit invalidation

pub mod cache;
pub mod error;
pub mod store;

pub use cache::{CacheStats, Clock, ManualClock, SchemaCache, SystemClock};
pub use error::StorageError;
pub use store::{MemorySchemaStore, SchemaStore};
