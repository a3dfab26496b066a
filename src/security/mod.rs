//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → auth.rs (bearer/query credential, constant-time comparison)
//!     → Pass to routing
//!
//! Webhook payloads:
//!     → webhook.rs (canonical JSON → HMAC-SHA256 → base64)
//! ```
//!
//! # Design Decisions
//! - Fail closed: any credential check failure rejects the request
//! - Credentials are opaque strings, never logged or echoed in responses

pub mod auth;
pub mod webhook;

pub use auth::{is_authorized_request, timing_safe_eq};
pub use webhook::{canonicalize, compute_webhook_hmac, verify_webhook_hmac};
