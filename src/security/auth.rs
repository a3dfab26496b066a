//! Inbound caller authentication.
//!
//! # Responsibilities
//! - Extract the bearer credential from header or query parameter
//! - Compare credentials in constant time
//!
//! # Design Decisions
//! - The comparator never short-circuits on length or first mismatch, so
//!   timing is independent of where (or whether) the inputs diverge
//! - A 401 carries no detail about why the credential was rejected

/// Byte-wise equal-time string comparison.
///
/// The mismatch accumulator is seeded with the length-inequality flag and
/// OR-ed with every byte difference up to the longer length; missing bytes
/// read as zero.
pub fn timing_safe_eq(a: &str, b: &str) -> bool {
    let a = a.as_bytes();
    let b = b.as_bytes();

    let mut mismatch = u8::from(a.len() != b.len());
    for i in 0..a.len().max(b.len()) {
        let a_byte = a.get(i).copied().unwrap_or(0);
        let b_byte = b.get(i).copied().unwrap_or(0);
        mismatch |= a_byte ^ b_byte;
    }

    mismatch == 0
}

/// Pull the token out of a `Bearer <token>` header value.
///
/// The scheme is case-insensitive and exactly one token word must follow it.
fn extract_bearer_token(header: &str) -> Option<&str> {
    let mut words = header.split_whitespace();
    let scheme = words.next()?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = words.next()?;
    if words.next().is_some() {
        return None;
    }
    Some(token)
}

/// Check the request credential against the configured token.
///
/// The `Authorization` header takes precedence; a request without a usable
/// bearer header falls back to the `?token=` query parameter. A missing or
/// empty credential is unauthorized without touching the comparator.
pub fn is_authorized_request(
    authorization_header: Option<&str>,
    token_query_param: Option<&str>,
    expected_token: &str,
) -> bool {
    let header = authorization_header.map(str::trim).unwrap_or("");
    let provided = extract_bearer_token(header)
        .or_else(|| token_query_param.filter(|token| !token.is_empty()));

    match provided {
        Some(token) => timing_safe_eq(token, expected_token),
        None => false,
    }
}
