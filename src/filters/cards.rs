//! Card payload sanitization.
//!
//! Projects upstream card objects onto an explicit output allowlist.
//! PAN, CVV and expiry fields are not on the allowlist and therefore can
//! never reach a caller, no matter what the upstream returns.

use serde_json::Value;

use crate::filters::helpers::{as_record, field, pick_bool, project, FieldKind, FieldSpec, UnknownRecord};

const FUNDING_SOURCE_FIELDS: &[FieldSpec] = &[
    field("created", FieldKind::String),
    field("token", FieldKind::String),
    field("type", FieldKind::String),
    field("state", FieldKind::String),
    field("nickname", FieldKind::String),
    field("account_name", FieldKind::String),
    field("last_four", FieldKind::String),
];

const CARD_FIELDS: &[FieldSpec] = &[
    field("created", FieldKind::String),
    field("token", FieldKind::String),
    field("last_four", FieldKind::String),
    field("hostname", FieldKind::String),
    field("memo", FieldKind::String),
    field("type", FieldKind::String),
    field("spend_limit", FieldKind::Number),
    field("spend_limit_duration", FieldKind::String),
    field("state", FieldKind::String),
    field("funding", FieldKind::Nested(FUNDING_SOURCE_FIELDS)),
    field("auth_rule_tokens", FieldKind::StringArray),
];

/// Sanitize a single upstream card object.
///
/// Non-object input produces an empty output object.
pub fn sanitize_card(card: &Value) -> UnknownRecord {
    match as_record(card) {
        Some(record) => project(record, CARD_FIELDS),
        None => UnknownRecord::new(),
    }
}

/// Sanitize an upstream cards response, list or single resource.
///
/// A paginated envelope is detected by an array-valued `data` field; every
/// element is sanitized and only the `has_more` cursor flag survives at the
/// envelope level. Anything else is treated as a single card.
pub fn sanitize_cards_payload(payload: &Value) -> UnknownRecord {
    let Some(record) = as_record(payload) else {
        return UnknownRecord::new();
    };

    if let Some(Value::Array(cards)) = record.get("data") {
        let mut envelope = UnknownRecord::new();
        envelope.insert(
            "data".to_string(),
            Value::Array(cards.iter().map(|card| Value::Object(sanitize_card(card))).collect()),
        );
        if let Some(has_more) = pick_bool(record, "has_more") {
            envelope.insert("has_more".to_string(), Value::Bool(has_more));
        }
        return envelope;
    }

    sanitize_card(payload)
}
