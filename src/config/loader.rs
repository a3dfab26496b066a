//! Configuration loading from the environment.
//!
//! # Responsibilities
//! - Resolve required secrets and optional overrides
//! - Fail fast at startup when a secret is missing or malformed
//!
//! # Design Decisions
//! - Error messages name the offending variable, never its value
//! - The lookup is injectable so tests never touch process-global state

use thiserror::Error;

use crate::config::schema::{ListenerConfig, ObservabilityConfig, RuntimeConfig, UpstreamConfig};

pub const ENV_UPSTREAM_API_KEY: &str = "PRIVACY_API_KEY";
pub const ENV_WORKER_BEARER_TOKEN: &str = "READONLY_PRIVACY_BEARER_TOKEN";
pub const ENV_UPSTREAM_BASE_URL: &str = "PRIVACY_BASE_URL";
pub const ENV_ENABLE_TRANSACTION_TOKEN_ROUTE: &str = "ENABLE_TRANSACTION_TOKEN_ROUTE";
pub const ENV_BIND_ADDRESS: &str = "BIND_ADDRESS";
pub const ENV_UPSTREAM_TIMEOUT_MS: &str = "UPSTREAM_TIMEOUT_MS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
pub const ENV_METRICS_ADDRESS: &str = "METRICS_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required secret is missing or empty.
    #[error("required environment variable {0} is missing or empty")]
    MissingSecret(&'static str),

    /// A variable is present but does not parse.
    #[error("environment variable {0} has an invalid value")]
    InvalidValue(&'static str),
}

fn parse_boolean_flag(value: Option<String>) -> bool {
    matches!(value, Some(flag) if flag.eq_ignore_ascii_case("true"))
}

fn require_secret(
    lookup: &dyn Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingSecret(name)),
    }
}

/// Resolve the runtime configuration through an injectable lookup.
pub fn load(lookup: &dyn Fn(&str) -> Option<String>) -> Result<RuntimeConfig, ConfigError> {
    let api_key = require_secret(lookup, ENV_UPSTREAM_API_KEY)?;
    let worker_bearer_token = require_secret(lookup, ENV_WORKER_BEARER_TOKEN)?;

    let defaults = UpstreamConfig::default();
    let base_url = lookup(ENV_UPSTREAM_BASE_URL).unwrap_or(defaults.base_url);
    url::Url::parse(&base_url).map_err(|_| ConfigError::InvalidValue(ENV_UPSTREAM_BASE_URL))?;

    let timeout_ms = match lookup(ENV_UPSTREAM_TIMEOUT_MS) {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidValue(ENV_UPSTREAM_TIMEOUT_MS))?,
        None => defaults.timeout_ms,
    };

    let listener_defaults = ListenerConfig::default();
    let request_timeout_secs = match lookup(ENV_REQUEST_TIMEOUT_SECS) {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidValue(ENV_REQUEST_TIMEOUT_SECS))?,
        None => listener_defaults.request_timeout_secs,
    };

    Ok(RuntimeConfig {
        listener: ListenerConfig {
            bind_address: lookup(ENV_BIND_ADDRESS).unwrap_or(listener_defaults.bind_address),
            request_timeout_secs,
        },
        upstream: UpstreamConfig {
            api_key,
            base_url,
            timeout_ms,
        },
        worker_bearer_token,
        enable_transaction_token_route: parse_boolean_flag(lookup(
            ENV_ENABLE_TRANSACTION_TOKEN_ROUTE,
        )),
        observability: ObservabilityConfig {
            metrics_address: lookup(ENV_METRICS_ADDRESS),
        },
    })
}

/// Resolve the runtime configuration from process environment variables.
pub fn load_from_env() -> Result<RuntimeConfig, ConfigError> {
    load(&|name| std::env::var(name).ok())
}
