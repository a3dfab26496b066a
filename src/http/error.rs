//! Handler-facing error type.
//!
//! Validation failures become 400s at the boundary nearest their source;
//! upstream failures propagate as one typed error and are converted here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::http::response::{error_response, sanitize_upstream_error};
use crate::query::ValidationError;
use crate::upstream::UpstreamError;

/// Everything a route handler can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(error) => {
                error_response(StatusCode::BAD_REQUEST, "bad_request", &error.to_string())
            }
            ApiError::Upstream(error) => {
                tracing::warn!(status = error.status, "Upstream request failed");
                sanitize_upstream_error(error.status)
            }
        }
    }
}
