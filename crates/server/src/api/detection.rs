use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use shadowscan_core::{Anomaly, DetectionRequest};

use super::JsonBody;
use crate::error::ApiError;
use crate::state::AppState;

/// `POST /api/detection/validate`: anomalies for one observed request.
pub async fn validate_detection(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<DetectionRequest>,
) -> Result<Json<Vec<Anomaly>>, ApiError> {
    let anomalies = state.detection.detect(&request)?;
    Ok(Json(anomalies))
}
