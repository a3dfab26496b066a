//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! environment variables
//!     → loader.rs (resolve, validate secrets present)
//!     → RuntimeConfig (validated, immutable)
//!     → shared via Arc to all request handlers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - Secrets are required and checked non-empty at startup, so a
//!   misconfigured deployment fails before it serves a single request
//! - Loader errors name the variable, never the value

pub mod loader;
pub mod schema;

pub use loader::{load_from_env, ConfigError};
pub use schema::RuntimeConfig;
