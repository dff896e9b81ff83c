use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use shadowscan_core::config::IngestConfig;
use shadowscan_core::{LearnedModel, SchemaKey};
use shadowscan_storage::{SchemaCache, SchemaStore};

use crate::error::IngestError;
use crate::validation::validate_models;

/// Counts for one accepted batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    pub received: usize,
    pub stored: usize,
    /// Later occurrences of a key already seen in the batch.
    pub duplicates: usize,
}

/// Validates model batches, writes them to the store, and invalidates the
/// cache for every written key.
pub struct IngestionService {
    store: Arc<dyn SchemaStore>,
    cache: Arc<SchemaCache>,
    limits: IngestConfig,
}

impl IngestionService {
    pub fn new(store: Arc<dyn SchemaStore>, cache: Arc<SchemaCache>, limits: IngestConfig) -> Self {
        Self {
            store,
            cache,
            limits,
        }
    }

    /// Store a batch of learned models. All-or-nothing with respect to
    /// validation: a batch with any violation stores nothing.
    pub fn ingest(&self, models: Vec<LearnedModel>) -> Result<IngestSummary, IngestError> {
        self.check_batch_size(models.len())?;

        let report = validate_models(&models, &self.limits);
        if !report.valid {
            warn!(
                violations = report.errors.len(),
                "rejected model batch: {}",
                report.summary()
            );
            return Err(IngestError::InvalidModelSyntax(report));
        }
        for warning in &report.warnings {
            debug!(path = %warning.path, "{}", warning.message);
        }

        let received = models.len();
        let mut batch: HashMap<SchemaKey, Arc<LearnedModel>> = HashMap::with_capacity(received);
        for model in models {
            batch.entry(model.key()).or_insert_with(|| Arc::new(model));
        }
        let keys: Vec<SchemaKey> = batch.keys().cloned().collect();

        self.store.save_batch(batch)?;
        for key in &keys {
            self.cache.evict(key);
        }

        let summary = IngestSummary {
            received,
            stored: keys.len(),
            duplicates: received - keys.len(),
        };
        debug!(
            received = summary.received,
            stored = summary.stored,
            duplicates = summary.duplicates,
            "ingested model batch"
        );
        Ok(summary)
    }

    fn check_batch_size(&self, size: usize) -> Result<(), IngestError> {
        if size == 0 {
            warn!("received empty model list");
            return Err(IngestError::EmptyModelList);
        }
        let limit = self.limits.max_models_per_request;
        if size > limit {
            warn!(size, limit, "rejected oversized model batch");
            return Err(IngestError::ModelListTooLarge { size, limit });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use shadowscan_core::ParamSpec;
    use shadowscan_storage::{ManualClock, MemorySchemaStore};

    struct Fixture {
        store: Arc<MemorySchemaStore>,
        cache: Arc<SchemaCache>,
        service: IngestionService,
    }

    fn fixture(limits: IngestConfig) -> Fixture {
        let store = Arc::new(MemorySchemaStore::new());
        let cache = Arc::new(SchemaCache::with_clock(
            store.clone(),
            16,
            Duration::from_secs(60),
            Arc::new(ManualClock::new()),
        ));
        let service = IngestionService::new(store.clone(), cache.clone(), limits);
        Fixture {
            store,
            cache,
            service,
        }
    }

    fn search(types: &[&str]) -> LearnedModel {
        LearnedModel::new("GET", "/api/search").with_query_param(ParamSpec::new("q", types, true))
    }

    #[test]
    fn empty_batch_is_rejected() {
        let f = fixture(IngestConfig::default());
        let err = f.service.ingest(Vec::new()).unwrap_err();
        assert!(matches!(err, IngestError::EmptyModelList));
        assert_eq!(err.to_string(), "Received list size: 0");
    }

    #[test]
    fn oversized_batch_is_rejected_before_model_checks() {
        let f = fixture(IngestConfig::default());
        let err = f.service.ingest(vec![LearnedModel::new("GET", "/a"); 1001]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Batch size 1001 exceeds the maximum allowed limit of 1000"
        );
        assert!(f.store.is_empty());
    }

    #[test]
    fn invalid_batch_stores_nothing() {
        let f = fixture(IngestConfig::default());
        let err = f
            .service
            .ingest(vec![
                search(&["String"]),
                search(&["Float"]).with_header(ParamSpec::new("", &["Int"], true)),
            ])
            .unwrap_err();
        match err {
            IngestError::InvalidModelSyntax(report) => assert_eq!(report.errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
        assert!(f.store.is_empty());
    }

    #[test]
    fn first_duplicate_wins() {
        let f = fixture(IngestConfig::default());
        let summary = f
            .service
            .ingest(vec![search(&["String"]), search(&["Int"])])
            .unwrap();
        assert_eq!(
            summary,
            IngestSummary {
                received: 2,
                stored: 1,
                duplicates: 1
            }
        );
        let stored = f.store.find_by_key(&search(&[]).key()).unwrap().unwrap();
        assert_eq!(stored.query_params[0].types, vec!["String"]);
    }

    #[test]
    fn ingestion_invalidates_cached_entries() {
        let f = fixture(IngestConfig::default());
        let key = search(&[]).key();
        assert!(f.cache.get(&key).unwrap().is_none());

        f.service.ingest(vec![search(&["String"])]).unwrap();
        assert!(f.cache.get(&key).unwrap().is_some());

        f.service.ingest(vec![search(&["Int"])]).unwrap();
        let model = f.cache.get(&key).unwrap().unwrap();
        assert_eq!(model.query_params[0].types, vec!["Int"]);
    }
}
