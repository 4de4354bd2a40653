//! Mapping of domain failures to HTTP responses
//!
//! Every variant is a client error. Anything else that escapes a handler is a
//! defect and surfaces through axum as a plain 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

use sigman_core::{FilterError, SampleError, ValidationError, Violation};

/// Errors returned by API handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    InvalidPattern(#[from] FilterError),

    #[error(transparent)]
    InvalidSampleSize(#[from] SampleError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidSampleSize(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::InvalidPattern(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!("Rejected request ({}): {}", status.as_u16(), self);

        let body = match &self {
            ApiError::Validation(e) => json!({
                "error": "validation_error",
                "detail": e.violations,
            }),
            ApiError::InvalidSampleSize(e) => json!({
                "error": "validation_error",
                "detail": [Violation::new("sample_size", e.to_string())],
            }),
            ApiError::InvalidPattern(e) => json!({
                "error": "invalid_pattern",
                "detail": e.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
