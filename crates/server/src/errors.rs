use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use common::media::UploadError;
use common::ActionOutcome;
use service::errors::ServiceError;

/// JSON error body: `{"error": title, "message": detail}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: String,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: Option<String>) -> Self {
        Self { status, title: title.into(), detail }
    }

    pub fn not_found(detail: String) -> Self { Self::new(StatusCode::NOT_FOUND, "Not Found", Some(detail)) }

    pub fn conflict(detail: String) -> Self { Self::new(StatusCode::CONFLICT, "Conflict", Some(detail)) }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, title = %self.title, detail = ?self.detail, "request failed");
        }
        let body = serde_json::json!({ "error": self.title, "message": self.detail });
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let (status, title) = match &e {
            ServiceError::Conflict(m) => return Self::conflict(m.clone()),
            ServiceError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation Error"),
            ServiceError::Lookup(_) => (StatusCode::NOT_FOUND, "Lookup Failed"),
            ServiceError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Persistence Failed"),
            ServiceError::Consistency(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Consistency Error"),
        };
        Self::new(status, title, Some(e.to_string()))
    }
}

impl From<UploadError> for JsonApiError {
    fn from(e: UploadError) -> Self {
        let (status, title) = match &e {
            UploadError::Rejected(_) => (StatusCode::BAD_REQUEST, "Upload Rejected"),
            UploadError::Storage(_) | UploadError::Transport(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Upload Failed"),
        };
        Self::new(status, title, Some(e.to_string()))
    }
}

/// Unwrap an action outcome into its value, mapping NotFound to 404 and
/// Conflict to 409.
pub fn outcome<T>(out: ActionOutcome<T>) -> Result<T, JsonApiError> {
    match out {
        ActionOutcome::Ok(v) => Ok(v),
        ActionOutcome::NotFound(m) => Err(JsonApiError::not_found(m)),
        ActionOutcome::Conflict(m) => Err(JsonApiError::conflict(m)),
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
