//! Codec between flat JSON scalar maps and Firestore's typed value envelopes.
//!
//! Firestore documents carry `{"fields": {"name": {"stringValue": "…"}}}` on
//! the wire. The catalog layout is flat scalars only, so the codec supports
//! exactly the scalar kinds and rejects everything else with a typed error.

use serde_json::{json, Map, Number, Value};

use crate::error::StoreError;
use crate::DocumentFields;

/// Encodes a flat field map into Firestore typed values.
///
/// # Errors
///
/// Returns [`StoreError::UnsupportedValue`] for arrays, objects, and numbers
/// that cannot be represented (non-finite).
pub(super) fn encode_fields(fields: &DocumentFields) -> Result<Map<String, Value>, StoreError> {
    fields
        .iter()
        .map(|(name, value)| Ok((name.clone(), encode_value(name, value)?)))
        .collect()
}

/// Decodes Firestore typed values back into a flat field map.
///
/// # Errors
///
/// Returns [`StoreError::UnsupportedValue`] for non-scalar kinds
/// (`mapValue`, `arrayValue`, `timestampValue`, …) and malformed envelopes.
pub(super) fn decode_fields(fields: &Map<String, Value>) -> Result<DocumentFields, StoreError> {
    fields
        .iter()
        .map(|(name, value)| Ok((name.clone(), decode_value(name, value)?)))
        .collect()
}

fn encode_value(field: &str, value: &Value) -> Result<Value, StoreError> {
    match value {
        Value::Null => Ok(json!({ "nullValue": null })),
        Value::Bool(b) => Ok(json!({ "booleanValue": b })),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                // integerValue is a decimal string on the wire.
                Ok(json!({ "integerValue": i.to_string() }))
            } else if let Some(f) = n.as_f64() {
                Ok(json!({ "doubleValue": f }))
            } else {
                Err(unsupported(field, "number"))
            }
        }
        Value::String(s) => Ok(json!({ "stringValue": s })),
        Value::Array(_) => Err(unsupported(field, "array")),
        Value::Object(_) => Err(unsupported(field, "map")),
    }
}

fn decode_value(field: &str, value: &Value) -> Result<Value, StoreError> {
    let Some(envelope) = value.as_object() else {
        return Err(unsupported(field, "bare value"));
    };
    let Some((kind, inner)) = envelope.iter().next() else {
        return Err(unsupported(field, "empty envelope"));
    };
    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| unsupported(field, "booleanValue")),
        "integerValue" => inner
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .map(|i| Value::Number(i.into()))
            .ok_or_else(|| unsupported(field, "integerValue")),
        "doubleValue" => inner
            .as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| unsupported(field, "doubleValue")),
        "stringValue" => inner
            .as_str()
            .map(|s| Value::String(s.to_owned()))
            .ok_or_else(|| unsupported(field, "stringValue")),
        other => Err(unsupported(field, other)),
    }
}

fn unsupported(field: &str, kind: &str) -> StoreError {
    StoreError::UnsupportedValue {
        field: field.to_owned(),
        kind: kind.to_owned(),
    }
}
