use std::sync::Arc;

use shadowscan_core::Config;
use shadowscan_detect::{DetectionService, IngestionService};
use shadowscan_storage::{MemorySchemaStore, SchemaCache, SchemaStore};

/// Shared handles for every request.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn SchemaStore>,
    pub cache: Arc<SchemaCache>,
    pub ingestion: IngestionService,
    pub detection: DetectionService,
}

impl AppState {
    /// State over a fresh in-memory store.
    pub fn new(config: Config) -> Self {
        Self::with_store(config, Arc::new(MemorySchemaStore::new()))
    }

    pub fn with_store(config: Config, store: Arc<dyn SchemaStore>) -> Self {
        let cache = Arc::new(SchemaCache::new(store.clone(), &config.cache));
        let ingestion = IngestionService::new(store.clone(), cache.clone(), config.ingest.clone());
        let detection = DetectionService::new(cache.clone(), &config.detection);
        Self {
            config,
            store,
            cache,
            ingestion,
            detection,
        }
    }
}
