//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → server.rs (Axum setup, auth, dispatch)
//!     → request.rs (request ID)
//!     → query/filters/upstream (validate, forward, sanitize)
//!     → response.rs (JSON envelope, upstream error sanitization)
//!     → Send to client
//! ```

pub mod error;
pub mod request;
pub mod response;
pub mod server;

pub use error::ApiError;
pub use request::X_REQUEST_ID;
pub use server::{build_router, AppState, HttpServer};
