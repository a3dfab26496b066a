//! Webhook HMAC signing and verification.
//!
//! # Responsibilities
//! - Render JSON payloads into a deterministic canonical form
//! - Sign the canonical form with HMAC-SHA256, base64-encoded
//! - Verify candidate signatures in constant time
//!
//! # Design Decisions
//! - Canonicalization sorts object keys by code point, so the signature is
//!   independent of key insertion order and stable across platforms
//! - Verification never distinguishes an empty candidate from a mismatch

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;

use crate::security::auth::timing_safe_eq;

type HmacSha256 = Hmac<Sha256>;

fn encode_json_string(value: &str) -> String {
    // String encoding cannot fail; fall back to a bare quote pair rather
    // than panicking if it somehow does.
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

/// Deterministic string form of a JSON value, used as the signing input.
///
/// Primitives render as standard JSON; arrays render element-wise inside
/// brackets; objects render their keys sorted by code point as
/// `"key":value` pairs inside braces.
pub fn canonicalize(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => encode_json_string(text),
        Value::Array(entries) => {
            let inner: Vec<String> = entries.iter().map(canonicalize).collect();
            format!("[{}]", inner.join(","))
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            let inner: Vec<String> = entries
                .iter()
                .map(|(key, entry)| format!("{}:{}", encode_json_string(key), canonicalize(entry)))
                .collect();
            format!("{{{}}}", inner.join(","))
        }
    }
}

/// HMAC-SHA256 over the canonical payload, base64-encoded.
pub fn compute_webhook_hmac(secret: &str, payload: &Value) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC-SHA256 accepts any key size");
    mac.update(canonicalize(payload).as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// Verify a candidate webhook signature.
///
/// Returns false for an absent or blank candidate, or when the recomputed
/// signature differs. The comparison is constant-time.
pub fn verify_webhook_hmac(secret: &str, payload: &Value, candidate: Option<&str>) -> bool {
    let candidate = candidate.map(str::trim).unwrap_or("");
    if candidate.is_empty() {
        return false;
    }

    let expected = compute_webhook_hmac(secret, payload);
    timing_safe_eq(candidate, &expected)
}
