//! Upstream card API client with timeout and error classification.
//!
//! # Responsibilities
//! - Issue authenticated GET requests against the upstream API
//! - Bound every call with a timeout
//! - Classify every failure mode into a single error type

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tokio::time::timeout;

use crate::config::schema::UpstreamConfig;

/// Any upstream-call failure, carrying only non-sensitive data.
///
/// The routing layer maps this onto a sanitized response; the raw upstream
/// body is kept for debugging but never echoed to callers.
#[derive(Debug, Error)]
#[error("upstream request failed with status {status}")]
pub struct UpstreamError {
    pub status: u16,
    pub body: Option<Value>,
}

impl UpstreamError {
    fn transport(status: u16) -> Self {
        Self { status, body: None }
    }
}

/// Timeout-bounded GET wrapper around the upstream card API.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    timeout_duration: Duration,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            timeout_duration: Duration::from_millis(config.timeout_ms),
        }
    }

    /// Issue a GET against `{base_url}{path_and_query}` and classify the
    /// outcome.
    ///
    /// One timeout bounds the entire call, headers and body alike; an
    /// upstream that returns headers and then stalls the body still fails
    /// within the configured bound.
    ///
    /// - non-2xx with a JSON body → error with status and parsed body
    /// - non-2xx with a non-JSON body → error with status, no body
    /// - timeout → error with status 504, no body
    /// - other transport failure → error with status 502, no body
    /// - 2xx JSON → parsed value; 2xx non-JSON → `Value::Null`
    pub async fn get(&self, path_and_query: &str) -> Result<Value, UpstreamError> {
        let url = format!("{}{}", self.base_url, path_and_query);
        match timeout(self.timeout_duration, self.fetch(&url)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.timeout_duration.as_millis() as u64,
                    "Upstream request timed out"
                );
                Err(UpstreamError::transport(504))
            }
        }
    }

    async fn fetch(&self, url: &str) -> Result<Value, UpstreamError> {
        let request = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(
                reqwest::header::AUTHORIZATION,
                format!("api-key {}", self.api_key),
            )
            .send();

        let response = match request.await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(error = %error, "Upstream transport failure");
                let status = if error.is_timeout() { 504 } else { 502 };
                return Err(UpstreamError::transport(status));
            }
        };

        let status = response.status();
        let declares_json = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_ascii_lowercase().contains("application/json"))
            .unwrap_or(false);

        let body = if declares_json {
            match response.json::<Value>().await {
                Ok(parsed) => Some(parsed),
                // Declared JSON but unparseable: an invalid upstream
                // response regardless of status code.
                Err(error) => {
                    tracing::warn!(status = status.as_u16(), error = %error, "Upstream body is not valid JSON");
                    return Err(UpstreamError::transport(502));
                }
            }
        } else {
            None
        };

        if !status.is_success() {
            return Err(UpstreamError {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body.unwrap_or(Value::Null))
    }
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_duration.as_millis())
            .finish()
    }
}
