//! Error envelope shared by every endpoint.
//!
//! Failures render as
//! `{"timestamp", "errorCode", "message", "debugMessage"}` where `errorCode`
//! and `message` are fixed per [`ErrorCode`] and `debugMessage` carries the
//! specific cause.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use shadowscan_detect::{DetectError, IngestError};

// ── Codes ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InternalError,
    InvalidJsonFormat,
    MissingRequestBody,
    ResourceNotFound,
    MethodNotAllowed,
    EmptyModelList,
    InvalidModelSyntax,
    ModelListTooLarge,
    ServiceUnavailable,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::InternalError => "ERROR-5000",
            ErrorCode::InvalidJsonFormat => "ERROR-4001",
            ErrorCode::MissingRequestBody => "ERROR-4002",
            ErrorCode::ResourceNotFound => "ERROR-4004",
            ErrorCode::MethodNotAllowed => "ERROR-4005",
            ErrorCode::EmptyModelList => "ERROR-4021",
            ErrorCode::InvalidModelSyntax => "ERROR-4022",
            ErrorCode::ModelListTooLarge => "ERROR-4023",
            ErrorCode::ServiceUnavailable => "ERROR-5030",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InvalidJsonFormat
            | ErrorCode::MissingRequestBody
            | ErrorCode::EmptyModelList
            | ErrorCode::InvalidModelSyntax => StatusCode::BAD_REQUEST,
            ErrorCode::ResourceNotFound => StatusCode::NOT_FOUND,
            ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorCode::ModelListTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::InternalError => "An unexpected error occurred",
            ErrorCode::InvalidJsonFormat => "Malformed JSON request",
            ErrorCode::MissingRequestBody => "Request body is missing",
            ErrorCode::ResourceNotFound => "The requested resource was not found",
            ErrorCode::MethodNotAllowed => "HTTP method not supported for this endpoint",
            ErrorCode::EmptyModelList => "The provided model list cannot be empty",
            ErrorCode::InvalidModelSyntax => "The provided model definition is invalid",
            ErrorCode::ModelListTooLarge => "Batch size exceeds limit",
            ErrorCode::ServiceUnavailable => "Schema lookup is temporarily unavailable",
        }
    }
}

// ── Envelope ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub timestamp: DateTime<Utc>,
    pub error_code: String,
    pub message: String,
    pub debug_message: String,
}

/// An endpoint failure, rendered through [`ErrorResponse`].
#[derive(Debug)]
pub struct ApiError {
    pub code: ErrorCode,
    pub debug_message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, debug_message: impl Into<String>) -> Self {
        Self {
            code,
            debug_message: debug_message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            timestamp: Utc::now(),
            error_code: self.code.code().to_string(),
            message: self.code.message().to_string(),
            debug_message: self.debug_message,
        };
        (self.code.status(), Json(body)).into_response()
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        let code = match &err {
            IngestError::EmptyModelList => ErrorCode::EmptyModelList,
            IngestError::ModelListTooLarge { .. } => ErrorCode::ModelListTooLarge,
            IngestError::InvalidModelSyntax(_) => ErrorCode::InvalidModelSyntax,
            IngestError::Storage(_) => ErrorCode::InternalError,
        };
        if code == ErrorCode::InternalError {
            error!(error = %err, "model ingestion failed");
        } else {
            warn!(code = code.code(), "model batch rejected: {}", err);
        }
        ApiError::new(code, err.to_string())
    }
}

impl From<DetectError> for ApiError {
    fn from(err: DetectError) -> Self {
        match err {
            DetectError::InvalidRequest(report) => {
                let details = report.summary();
                warn!("invalid detection request: {}", details);
                ApiError::new(ErrorCode::InvalidJsonFormat, details)
            }
            DetectError::Unavailable(e) => ApiError::new(ErrorCode::ServiceUnavailable, e.to_string()),
        }
    }
}
