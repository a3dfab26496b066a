//! Response sanitization subsystem.
//!
//! # Data Flow
//! ```text
//! Upstream JSON (untrusted)
//!     → helpers.rs (typed field extraction, table-driven projection)
//!     → cards.rs / transactions.rs (per-resource allowlists)
//!     → Fresh output object (only allowlisted fields)
//! ```
//!
//! # Design Decisions
//! - Allowlist, never blocklist: unknown upstream fields are dropped by default
//! - One function serves both list and detail routes via `data` detection
//! - Sanitizers are pure functions of their input, no shared state

pub mod cards;
pub mod helpers;
pub mod transactions;

pub use cards::{sanitize_card, sanitize_cards_payload};
pub use transactions::{sanitize_transaction, sanitize_transactions_payload};
