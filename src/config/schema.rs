//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! Values are resolved from the environment by the loader; all types derive
//! Serde traits so the resolved config can be round-tripped in tests.

use serde::{Deserialize, Serialize};

/// Root configuration for the read-only card proxy.
///
/// Immutable once loaded; shared via `Arc` with every request handler.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Listener configuration (bind address, request timeout).
    pub listener: ListenerConfig,

    /// Upstream card API settings.
    pub upstream: UpstreamConfig,

    /// Bearer token inbound callers must present.
    pub worker_bearer_token: String,

    /// Enable the `GET /transactions/{token}` route (off by default).
    pub enable_transaction_token_route: bool,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Total request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Upstream card API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// API key presented to the upstream (`authorization: api-key …`).
    pub api_key: String,

    /// Upstream base URL, no trailing slash.
    pub base_url: String,

    /// Upstream request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.privacy.com/v1".to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Prometheus exporter bind address; metrics disabled when unset.
    pub metrics_address: Option<String>,
}
