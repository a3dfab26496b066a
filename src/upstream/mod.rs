//! Upstream card API subsystem.
//!
//! # Data Flow
//! ```text
//! Validated path + canonical query
//!     → client.rs (GET with api-key auth, bounded by timeout)
//!     → JSON value on success
//!     → UpstreamError { status, body } on any failure
//! ```
//!
//! # Design Decisions
//! - One error taxonomy for every failure mode; no raw transport errors
//!   cross this boundary
//! - No retries: one upstream failure maps to one classified client error

pub mod client;

pub use client::{UpstreamClient, UpstreamError};
