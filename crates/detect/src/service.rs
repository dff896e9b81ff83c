use std::sync::Arc;

use tracing::{error, info};

use shadowscan_core::config::DetectionConfig;
use shadowscan_core::{Anomaly, DetectionRequest};
use shadowscan_storage::SchemaCache;

use crate::engine::detect_anomalies;
use crate::error::DetectError;
use crate::validation::validate_request;

/// Resolves the learned model for a request and runs the anomaly engine.
pub struct DetectionService {
    cache: Arc<SchemaCache>,
    fail_open: bool,
}

impl DetectionService {
    pub fn new(cache: Arc<SchemaCache>, config: &DetectionConfig) -> Self {
        Self {
            cache,
            fail_open: config.fail_open,
        }
    }

    /// Anomalies for `request`, empty when it matches its model.
    ///
    /// An unknown `METHOD:PATH` yields a single `UNKNOWN_ENDPOINT`. A failed
    /// schema lookup yields no anomalies when failing open, otherwise
    /// [`DetectError::Unavailable`].
    pub fn detect(&self, request: &DetectionRequest) -> Result<Vec<Anomaly>, DetectError> {
        let report = validate_request(request);
        if !report.valid {
            return Err(DetectError::InvalidRequest(report));
        }

        let key = request.key();
        match self.cache.get(&key) {
            Ok(Some(model)) => {
                let anomalies = detect_anomalies(request, &model);
                if !anomalies.is_empty() {
                    info!(key = %key, count = anomalies.len(), "anomalies detected");
                }
                Ok(anomalies)
            }
            Ok(None) => {
                info!(key = %key, "request to unknown endpoint");
                Ok(vec![Anomaly::unknown_endpoint()])
            }
            Err(e) if self.fail_open => {
                error!(key = %key, error = %e, "schema lookup failed, skipping detection");
                Ok(Vec::new())
            }
            Err(e) => {
                error!(key = %key, error = %e, "schema lookup failed");
                Err(DetectError::Unavailable(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    use shadowscan_core::{AnomalyType, LearnedModel, ParamSpec, SchemaKey};
    use shadowscan_storage::{ManualClock, MemorySchemaStore, SchemaStore, StorageError};

    struct BrokenStore;

    impl SchemaStore for BrokenStore {
        fn save_batch(&self, _: HashMap<SchemaKey, Arc<LearnedModel>>) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("down".into()))
        }

        fn find_by_key(&self, _: &SchemaKey) -> Result<Option<Arc<LearnedModel>>, StorageError> {
            Err(StorageError::Unavailable("down".into()))
        }

        fn len(&self) -> usize {
            0
        }
    }

    fn service(store: Arc<dyn SchemaStore>, fail_open: bool) -> DetectionService {
        let clock = Arc::new(ManualClock::new());
        let cache = SchemaCache::with_clock(store, 16, Duration::from_secs(60), clock);
        DetectionService::new(Arc::new(cache), &DetectionConfig { fail_open })
    }

    fn seeded() -> Arc<MemorySchemaStore> {
        let store = MemorySchemaStore::new();
        let model = LearnedModel::new("GET", "/api/search")
            .with_query_param(ParamSpec::new("q", &["String"], true));
        store
            .save_batch(HashMap::from([(model.key(), Arc::new(model))]))
            .unwrap();
        Arc::new(store)
    }

    #[test]
    fn unknown_endpoint_is_a_single_anomaly() {
        let anomalies = service(seeded(), true)
            .detect(&DetectionRequest::new("DELETE", "/api/database/drop"))
            .unwrap();
        assert_eq!(anomalies, vec![Anomaly::unknown_endpoint()]);
    }

    #[test]
    fn method_case_does_not_matter() {
        let request = DetectionRequest::new(" get", "/api/search").with_query_param("q", "shoes");
        assert!(service(seeded(), true).detect(&request).unwrap().is_empty());
    }

    #[test]
    fn known_endpoint_runs_the_engine() {
        let request = DetectionRequest::new("GET", "/api/search");
        let anomalies = service(seeded(), true).detect(&request).unwrap();
        assert_eq!(anomalies.len(), 1);
        assert_eq!(
            anomalies[0].anomaly_type,
            AnomalyType::Missing(shadowscan_core::Section::QueryParam)
        );
    }

    #[test]
    fn blank_identity_is_rejected() {
        let err = service(seeded(), true)
            .detect(&DetectionRequest::new("", "/api/search"))
            .unwrap_err();
        assert!(matches!(err, DetectError::InvalidRequest(_)));
        assert_eq!(err.to_string(), "method: HTTP method is missing");
    }

    #[test]
    fn store_fault_fails_open_by_default() {
        let anomalies = service(Arc::new(BrokenStore), true)
            .detect(&DetectionRequest::new("GET", "/api/search"))
            .unwrap();
        assert!(anomalies.is_empty());
    }

    #[test]
    fn store_fault_can_fail_closed() {
        let err = service(Arc::new(BrokenStore), false)
            .detect(&DetectionRequest::new("GET", "/api/search"))
            .unwrap_err();
        assert!(matches!(
            err,
            DetectError::Unavailable(StorageError::Unavailable(_))
        ));
    }
}
