use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;

use shadowscan_core::LearnedModel;

use super::JsonBody;
use crate::error::ApiError;
use crate::state::AppState;

/// `POST /api/models`: ingest a batch of learned models. 200 with an empty
/// body on success.
pub async fn load_models(
    State(state): State<Arc<AppState>>,
    JsonBody(models): JsonBody<Vec<LearnedModel>>,
) -> Result<StatusCode, ApiError> {
    state.ingestion.ingest(models)?;
    Ok(StatusCode::OK)
}
