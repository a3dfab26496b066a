//! Transaction payload sanitization.
//!
//! Same allowlist-and-drop rule as the card filter, with the transaction's
//! nested shapes (merchant, events, funding entries) each projected onto
//! their own table.

use serde_json::Value;

use crate::filters::helpers::{as_record, field, pick_bool, project, FieldKind, FieldSpec, UnknownRecord};

const EVENT_FIELDS: &[FieldSpec] = &[
    field("amount", FieldKind::Number),
    field("created", FieldKind::String),
    field("result", FieldKind::String),
    field("type", FieldKind::String),
    field("token", FieldKind::String),
];

const FUNDING_ENTRY_FIELDS: &[FieldSpec] = &[
    field("amount", FieldKind::Number),
    field("token", FieldKind::String),
    field("type", FieldKind::String),
];

const MERCHANT_FIELDS: &[FieldSpec] = &[
    field("acceptor_id", FieldKind::String),
    field("city", FieldKind::String),
    field("country", FieldKind::String),
    field("descriptor", FieldKind::String),
    field("mcc", FieldKind::String),
    field("state", FieldKind::String),
];

const TRANSACTION_FIELDS: &[FieldSpec] = &[
    field("amount", FieldKind::Number),
    field("authorization_amount", FieldKind::Number),
    field("card_token", FieldKind::String),
    field("merchant_amount", FieldKind::Number),
    field("merchant_authorization_amount", FieldKind::Number),
    field("merchant_currency", FieldKind::String),
    field("acquirer_fee", FieldKind::Number),
    field("created", FieldKind::String),
    field("events", FieldKind::NestedArray(EVENT_FIELDS)),
    field("funding", FieldKind::NestedArray(FUNDING_ENTRY_FIELDS)),
    field("merchant", FieldKind::Nested(MERCHANT_FIELDS)),
    field("result", FieldKind::String),
    field("settled_amount", FieldKind::Number),
    field("status", FieldKind::String),
    field("token", FieldKind::String),
    field("authorization_code", FieldKind::String),
];

/// Sanitize a single upstream transaction object.
///
/// Non-object input produces an empty output object.
pub fn sanitize_transaction(transaction: &Value) -> UnknownRecord {
    match as_record(transaction) {
        Some(record) => project(record, TRANSACTION_FIELDS),
        None => UnknownRecord::new(),
    }
}

/// Sanitize an upstream transactions response, list or single resource.
pub fn sanitize_transactions_payload(payload: &Value) -> UnknownRecord {
    let Some(record) = as_record(payload) else {
        return UnknownRecord::new();
    };

    if let Some(Value::Array(entries)) = record.get("data") {
        let mut envelope = UnknownRecord::new();
        envelope.insert(
            "data".to_string(),
            Value::Array(
                entries
                    .iter()
                    .map(|entry| Value::Object(sanitize_transaction(entry)))
                    .collect(),
            ),
        );
        if let Some(has_more) = pick_bool(record, "has_more") {
            envelope.insert("has_more".to_string(), Value::Bool(has_more));
        }
        return envelope;
    }

    sanitize_transaction(payload)
}
