//! API error type and its JSON response mapping.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use faf_core::FafError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Transform(#[from] FafError),

    /// The body could not be read or parsed as JSON.
    #[error("invalid input: {0}")]
    Body(#[from] JsonRejection),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Error body: `{"error": <message>, "kind": <kind>}`.
#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
}

impl ApiError {
    pub fn is_client_error(&self) -> bool {
        match self {
            ApiError::Transform(e) => e.is_client_error(),
            ApiError::Body(_) => true,
            ApiError::Internal(_) => false,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            // Keep 413 from the body limit, everything else is a plain 400.
            ApiError::Body(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            _ if self.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Transform(e) => e.kind(),
            ApiError::Body(_) => "invalid_input",
            ApiError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
            kind: self.kind(),
        };
        (self.status(), Json(body)).into_response()
    }
}
