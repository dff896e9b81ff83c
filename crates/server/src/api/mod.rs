//! Endpoint handlers.

mod detection;
mod health;
mod models;

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::{Method, Uri};
use serde::de::DeserializeOwned;

use crate::error::{ApiError, ErrorCode};

pub use detection::validate_detection;
pub use health::{health, HealthResponse};
pub use models::load_models;

// ── JSON body extractor ──────────────────────────────────────────

/// JSON request body whose failures render as the error envelope:
/// an empty body is `ERROR-4002`, anything unparsable is `ERROR-4001`.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::new(ErrorCode::InvalidJsonFormat, e.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(ApiError::new(ErrorCode::MissingRequestBody, "request body is empty"));
        }
        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| ApiError::new(ErrorCode::InvalidJsonFormat, e.to_string()))
    }
}

// ── Fallbacks ────────────────────────────────────────────────────

pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::new(
        ErrorCode::ResourceNotFound,
        format!("Method: {}, URL: {}", method, uri.path()),
    )
}

pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::new(
        ErrorCode::MethodNotAllowed,
        format!("Request method '{}' is not supported for {}", method, uri.path()),
    )
}
