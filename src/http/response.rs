//! Response construction and upstream error sanitization.
//!
//! # Responsibilities
//! - Serialize JSON responses with an explicit charset
//! - Render the fixed error envelope `{"error":{"code","message"}}`
//! - Map upstream failures onto fixed, non-sensitive messages
//!
//! # Design Decisions
//! - Upstream bodies are never echoed to callers; messages come from a
//!   fixed per-status table
//! - An implausible upstream status (outside 100–599) is reported as 502

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// The fixed client-facing error envelope.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    error: ErrorBody,
}

/// Serialize a value as a JSON response with the given status.
pub fn json_response<T: Serialize>(body: &T, status: StatusCode) -> Response {
    let bytes = match serde_json::to_vec(body) {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!(error = %error, "Failed to serialize response body");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, JSON_CONTENT_TYPE)
        .body(Body::from(bytes))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// Render the error envelope.
pub fn error_response(status: StatusCode, code: &str, message: &str) -> Response {
    json_response(
        &ErrorEnvelope {
            error: ErrorBody {
                code: code.to_string(),
                message: message.to_string(),
            },
        },
        status,
    )
}

fn upstream_error_message(status: u16) -> &'static str {
    match status {
        400 => "Invalid request to upstream provider.",
        401 => "Authentication failed with upstream provider.",
        403 => "Upstream provider rejected this request.",
        404 => "Requested resource was not found.",
        422 => "Upstream provider could not process this request.",
        429 => "Upstream rate limit reached.",
        500 => "Upstream provider encountered an internal error.",
        502 => "Received an invalid response from upstream provider.",
        503 => "Upstream provider is unavailable.",
        504 => "Upstream provider timed out.",
        _ => "Upstream request failed.",
    }
}

/// Map an upstream failure onto a sanitized error response.
pub fn sanitize_upstream_error(status: u16) -> Response {
    let status = if (100..=599).contains(&status) { status } else { 502 };
    let message = upstream_error_message(status);

    error_response(
        StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
        "upstream_error",
        message,
    )
}
