//! Read-only forwarding proxy for a card-issuing API.
//!
//! Authenticates inbound callers, validates and re-encodes their query
//! parameters, forwards a whitelisted set of GET requests upstream, and
//! strips sensitive fields (PAN, CVV, expiry) from upstream JSON before
//! returning it.

pub mod config;
pub mod filters;
pub mod http;
pub mod observability;
pub mod openapi;
pub mod query;
pub mod security;
pub mod upstream;

pub use config::RuntimeConfig;
pub use http::{build_router, HttpServer};
