//! API Error Handling
//!
//! Unified error type and conversion for stub responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// API error type
#[derive(Debug)]
pub enum ApiError {
    /// Unknown or expired job; the service answers 400 for these
    UnknownJob(String),
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match self {
            ApiError::UnknownJob(uid) => format!("Unknown job {}", uid),
            ApiError::BadRequest(msg) => msg,
        };
        tracing::warn!("Rejecting request: {}", message);

        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": message })),
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
