//! Allowlist projection primitives.
//!
//! # Responsibilities
//! - Pick typed fields out of untyped upstream JSON
//! - Treat missing or mistyped values as absent, never as errors
//! - Project records onto declarative field tables
//!
//! # Design Decisions
//! - Absence is silent: optional fields never appear as explicit nulls
//! - Projection is table-driven so card and transaction shapes cannot drift
//! - Output maps are built fresh; nothing from the input survives unvetted

use serde_json::{Map, Value};

/// A JSON object of unknown shape, the universal sanitizer input.
pub type UnknownRecord = Map<String, Value>;

/// The typed extractor applied to a single allowlisted field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Keep the value only if it is a JSON string.
    String,
    /// Keep the value only if it is a JSON number (finite by construction).
    Number,
    /// Keep the value only if it is a JSON boolean.
    Bool,
    /// Keep string elements of a JSON array, dropping everything else.
    StringArray,
    /// Recurse into a nested object with its own field table.
    Nested(&'static [FieldSpec]),
    /// Recurse into an array of objects, each projected onto the table.
    NestedArray(&'static [FieldSpec]),
}

/// One allowlisted output field: a name and how to extract it.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// Shorthand constructor for field tables.
pub const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

/// Interpret a JSON value as a plain object.
///
/// Arrays and null are not records; callers treat `None` as "absent"
/// (nested shapes) or as an empty output (top-level sanitizers).
pub fn as_record(value: &Value) -> Option<&UnknownRecord> {
    value.as_object()
}

/// Extract a string field, or absent if missing or mistyped.
pub fn pick_string(record: &UnknownRecord, key: &str) -> Option<String> {
    match record.get(key) {
        Some(Value::String(value)) => Some(value.clone()),
        _ => None,
    }
}

/// Extract a numeric field, or absent if missing or mistyped.
///
/// `serde_json` numbers cannot hold NaN or infinities, so every extracted
/// number is finite.
pub fn pick_number(record: &UnknownRecord, key: &str) -> Option<serde_json::Number> {
    match record.get(key) {
        Some(Value::Number(value)) => Some(value.clone()),
        _ => None,
    }
}

/// Extract a boolean field, or absent if missing or mistyped.
pub fn pick_bool(record: &UnknownRecord, key: &str) -> Option<bool> {
    match record.get(key) {
        Some(Value::Bool(value)) => Some(*value),
        _ => None,
    }
}

/// Extract the string elements of an array field.
///
/// Non-string elements are dropped; a non-array value is absent.
pub fn pick_string_array(record: &UnknownRecord, key: &str) -> Option<Vec<String>> {
    match record.get(key) {
        Some(Value::Array(entries)) => Some(
            entries
                .iter()
                .filter_map(|entry| entry.as_str().map(str::to_owned))
                .collect(),
        ),
        _ => None,
    }
}

/// Project a record onto a field table.
///
/// The output contains only fields that extracted successfully, in table
/// order. Everything else in the input is dropped.
pub fn project(record: &UnknownRecord, specs: &[FieldSpec]) -> UnknownRecord {
    let mut output = UnknownRecord::new();
    for spec in specs {
        let value = match spec.kind {
            FieldKind::String => pick_string(record, spec.name).map(Value::String),
            FieldKind::Number => pick_number(record, spec.name).map(Value::Number),
            FieldKind::Bool => pick_bool(record, spec.name).map(Value::Bool),
            FieldKind::StringArray => pick_string_array(record, spec.name)
                .map(|strings| Value::Array(strings.into_iter().map(Value::String).collect())),
            FieldKind::Nested(nested) => record
                .get(spec.name)
                .and_then(as_record)
                .map(|inner| Value::Object(project(inner, nested))),
            FieldKind::NestedArray(nested) => match record.get(spec.name) {
                Some(Value::Array(entries)) => Some(Value::Array(
                    entries
                        .iter()
                        .map(|entry| {
                            Value::Object(
                                as_record(entry)
                                    .map(|inner| project(inner, nested))
                                    .unwrap_or_default(),
                            )
                        })
                        .collect(),
                )),
                _ => None,
            },
        };
        if let Some(value) = value {
            output.insert(spec.name.to_string(), value);
        }
    }
    output
}
