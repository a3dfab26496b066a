//! Inbound query validation and re-encoding.
//!
//! # Data Flow
//! ```text
//! Raw query string (untrusted)
//!     → parse_query_pairs (decode, duplicates preserved)
//!     → allowlist check (unknown names rejected before type checks)
//!     → per-field schema (UUID v4, date, bounded integer, enum)
//!     → fresh canonical query string for the upstream request
//! ```
//!
//! # Design Decisions
//! - The forwarded query is rebuilt from validated values only, so nothing
//!   the caller sent reaches the upstream verbatim
//! - Validation messages name the field category, never echo raw values
//! - First occurrence of a duplicated key wins; later duplicates are ignored
//! - `page_size` accepts canonical decimal integers only; lenient numeric
//!   forms such as `" 5"` or `"1e2"` are rejected

use percent_encoding::percent_decode_str;
use thiserror::Error;
use url::form_urlencoded;

/// Malformed or disallowed caller input. Always a 400-class failure.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Validator applied to one allowlisted query parameter.
#[derive(Debug, Clone, Copy)]
enum ParamKind {
    /// Canonical UUID v4 text: 8-4-4-4-12 hex, version nibble 4,
    /// variant nibble 8/9/a/b, case-insensitive.
    Uuid,
    /// `YYYY-MM-DD`, syntactic only.
    Date,
    /// Integer in [1, 1000], re-serialized in canonical decimal form.
    PageSize,
    /// Exactly `APPROVED` or `DECLINED`.
    TransactionResult,
}

/// Allowlist and serialization order for `GET /cards`.
const CARDS_QUERY_SCHEMA: &[(&str, ParamKind)] = &[
    ("account_token", ParamKind::Uuid),
    ("begin", ParamKind::Date),
    ("end", ParamKind::Date),
    ("page_size", ParamKind::PageSize),
    ("starting_after", ParamKind::Uuid),
];

/// Allowlist and serialization order for `GET /transactions`.
const TRANSACTIONS_QUERY_SCHEMA: &[(&str, ParamKind)] = &[
    ("account_token", ParamKind::Uuid),
    ("card_token", ParamKind::Uuid),
    ("begin", ParamKind::Date),
    ("end", ParamKind::Date),
    ("page_size", ParamKind::PageSize),
    ("starting_after", ParamKind::Uuid),
    ("result", ParamKind::TransactionResult),
];

/// Decode a raw query string into key/value pairs, duplicates preserved.
pub fn parse_query_pairs(raw_query: Option<&str>) -> Vec<(String, String)> {
    match raw_query {
        Some(raw) => form_urlencoded::parse(raw.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect(),
        None => Vec::new(),
    }
}

fn is_uuid_v4(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 36 {
        return false;
    }
    bytes.iter().enumerate().all(|(i, &byte)| match i {
        8 | 13 | 18 | 23 => byte == b'-',
        14 => byte == b'4',
        19 => matches!(byte.to_ascii_lowercase(), b'8' | b'9' | b'a' | b'b'),
        _ => byte.is_ascii_hexdigit(),
    })
}

fn is_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, &byte)| match i {
            4 | 7 => byte == b'-',
            _ => byte.is_ascii_digit(),
        })
}

/// Validate one parameter and return its canonical wire form.
fn canonical_value(kind: ParamKind, raw: &str) -> Option<String> {
    match kind {
        ParamKind::Uuid => is_uuid_v4(raw).then(|| raw.to_string()),
        ParamKind::Date => is_date(raw).then(|| raw.to_string()),
        ParamKind::PageSize => raw
            .parse::<u32>()
            .ok()
            .filter(|size| (1..=1000).contains(size))
            .map(|size| size.to_string()),
        ParamKind::TransactionResult => {
            matches!(raw, "APPROVED" | "DECLINED").then(|| raw.to_string())
        }
    }
}

fn build_query(
    pairs: &[(String, String)],
    schema: &[(&str, ParamKind)],
    decode_failure_message: &str,
) -> Result<String, ValidationError> {
    // Unknown names fail first, regardless of value shape.
    for (name, _) in pairs {
        if !schema.iter().any(|(allowed, _)| allowed == name) {
            return Err(ValidationError::new(format!("{name} is not a valid parameter.")));
        }
    }

    let first_value = |name: &str| {
        pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    };

    let mut sanitized = form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for &(name, kind) in schema {
        if let Some(raw) = first_value(name) {
            let canonical = canonical_value(kind, raw)
                .ok_or_else(|| ValidationError::new(decode_failure_message))?;
            sanitized.append_pair(name, &canonical);
            any = true;
        }
    }

    if any {
        Ok(format!("?{}", sanitized.finish()))
    } else {
        Ok(String::new())
    }
}

/// Validate and re-encode the query string for `GET /cards`.
pub fn build_cards_query(pairs: &[(String, String)]) -> Result<String, ValidationError> {
    build_query(pairs, CARDS_QUERY_SCHEMA, "Invalid cards query parameters.")
}

/// Validate and re-encode the query string for `GET /transactions`.
pub fn build_transactions_query(pairs: &[(String, String)]) -> Result<String, ValidationError> {
    build_query(pairs, TRANSACTIONS_QUERY_SCHEMA, "Invalid transactions query parameters.")
}

/// Validate a decoded path segment as a UUID v4 token.
pub fn validate_token_path_param(value: &str, field: &str) -> Result<(), ValidationError> {
    if is_uuid_v4(value) {
        Ok(())
    } else {
        Err(ValidationError::new(format!("{field} must be a valid UUID v4.")))
    }
}

/// Percent-decode a raw path segment captured by the router.
pub fn decode_path_token(encoded: &str, field: &str) -> Result<String, ValidationError> {
    percent_decode_str(encoded)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| ValidationError::new(format!("{field} has invalid URL encoding.")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const UUID: &str = "7ef7d65c-9023-4da3-b113-3b8583fd7951";

    fn pairs(raw: &str) -> Vec<(String, String)> {
        parse_query_pairs(Some(raw))
    }

    #[test]
    fn test_validate_token_accepts_uuid_v4() {
        assert!(validate_token_path_param(UUID, "card_token").is_ok());
        // Case-insensitive.
        assert!(validate_token_path_param(&UUID.to_uppercase(), "card_token").is_ok());
    }

    #[test]
    fn test_validate_token_rejects_non_uuid() {
        let err = validate_token_path_param("not-a-uuid", "card_token").unwrap_err();
        assert_eq!(err.to_string(), "card_token must be a valid UUID v4.");
    }

    #[test]
    fn test_validate_token_rejects_uuid_v1() {
        // Wrong version nibble.
        assert!(validate_token_path_param("550e8400-e29b-11d4-a716-446655440000", "card_token").is_err());
        // Wrong variant nibble.
        assert!(validate_token_path_param("7ef7d65c-9023-4da3-7113-3b8583fd7951", "card_token").is_err());
    }

    #[test]
    fn test_cards_query_empty() {
        assert_eq!(build_cards_query(&[]).unwrap(), "");
    }

    #[test]
    fn test_cards_query_passthrough() {
        assert_eq!(build_cards_query(&pairs("page_size=50")).unwrap(), "?page_size=50");
        assert_eq!(
            build_cards_query(&pairs(&format!("starting_after={UUID}"))).unwrap(),
            format!("?starting_after={UUID}")
        );
    }

    #[test]
    fn test_cards_query_rejects_unknown_param() {
        let err = build_cards_query(&pairs("page=1")).unwrap_err();
        assert_eq!(err.to_string(), "page is not a valid parameter.");
    }

    #[test]
    fn test_cards_query_unknown_param_beats_type_check() {
        // Well-formed value under an unknown name still fails, by name.
        let err = build_cards_query(&pairs(&format!("card={UUID}"))).unwrap_err();
        assert_eq!(err.to_string(), "card is not a valid parameter.");
    }

    #[test]
    fn test_cards_query_rejects_page_size_out_of_range() {
        assert!(build_cards_query(&pairs("page_size=9999")).is_err());
        assert!(build_cards_query(&pairs("page_size=0")).is_err());
        assert!(build_cards_query(&pairs("page_size=12.5")).is_err());
    }

    #[test]
    fn test_cards_query_rejects_bad_date() {
        let err = build_cards_query(&pairs("begin=01%2F01%2F2024")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid cards query parameters.");
    }

    #[test]
    fn test_cards_query_rejects_bad_uuid_value() {
        assert!(build_cards_query(&pairs("starting_after=bad")).is_err());
    }

    #[test]
    fn test_cards_query_fixed_field_order() {
        let query = build_cards_query(&pairs(&format!("page_size=5&account_token={UUID}&begin=2024-01-01"))).unwrap();
        assert_eq!(query, format!("?account_token={UUID}&begin=2024-01-01&page_size=5"));
    }

    #[test]
    fn test_cards_query_first_duplicate_wins() {
        assert_eq!(
            build_cards_query(&pairs("page_size=5&page_size=9999")).unwrap(),
            "?page_size=5"
        );
    }

    #[test]
    fn test_cards_query_canonicalizes_page_size() {
        assert_eq!(build_cards_query(&pairs("page_size=050")).unwrap(), "?page_size=50");
    }

    #[test]
    fn test_cards_query_rejects_lenient_page_size_forms() {
        assert!(build_cards_query(&pairs("page_size=%205")).is_err());
        assert!(build_cards_query(&pairs("page_size=1e2")).is_err());
    }

    #[test]
    fn test_transactions_query_result_filter() {
        assert_eq!(
            build_transactions_query(&pairs("result=APPROVED")).unwrap(),
            "?result=APPROVED"
        );
        let err = build_transactions_query(&pairs("result=MAYBE")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid transactions query parameters.");
        // Enum match is case-sensitive.
        assert!(build_transactions_query(&pairs("result=approved")).is_err());
    }

    #[test]
    fn test_transactions_query_card_token() {
        assert_eq!(
            build_transactions_query(&pairs(&format!("card_token={UUID}"))).unwrap(),
            format!("?card_token={UUID}")
        );
    }

    #[test]
    fn test_transactions_query_rejects_unknown_param() {
        assert!(build_transactions_query(&pairs("page=1")).is_err());
    }

    #[test]
    fn test_decode_path_token() {
        assert_eq!(decode_path_token(UUID, "card_token").unwrap(), UUID);
        assert_eq!(decode_path_token("a%20b", "card_token").unwrap(), "a b");
        let err = decode_path_token("%ff%fe", "card_token").unwrap_err();
        assert_eq!(err.to_string(), "card_token has invalid URL encoding.");
    }
}
