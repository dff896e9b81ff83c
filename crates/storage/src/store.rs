//! Learned-model persistence.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use shadowscan_core::{LearnedModel, SchemaKey};

use crate::error::StorageError;

/// Keyed persistence for learned models.
///
/// Implementations must be safe for concurrent use. A `save_batch` upserts
/// every entry; a model is never observed half-written.
pub trait SchemaStore: Send + Sync {
    fn save_batch(&self, batch: HashMap<SchemaKey, Arc<LearnedModel>>) -> Result<(), StorageError>;

    fn find_by_key(&self, key: &SchemaKey) -> Result<Option<Arc<LearnedModel>>, StorageError>;

    /// Number of stored models.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-lifetime store over a sharded concurrent map.
#[derive(Default)]
pub struct MemorySchemaStore {
    models: DashMap<SchemaKey, Arc<LearnedModel>>,
}

impl MemorySchemaStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SchemaStore for MemorySchemaStore {
    fn save_batch(&self, batch: HashMap<SchemaKey, Arc<LearnedModel>>) -> Result<(), StorageError> {
        let count = batch.len();
        for (key, model) in batch {
            self.models.insert(key, model);
        }
        debug!(count, total = self.models.len(), "saved model batch");
        Ok(())
    }

    fn find_by_key(&self, key: &SchemaKey) -> Result<Option<Arc<LearnedModel>>, StorageError> {
        Ok(self.models.get(key).map(|entry| Arc::clone(entry.value())))
    }

    fn len(&self) -> usize {
        self.models.len()
    }
}
