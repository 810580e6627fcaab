//! Value-equivalence rules and tree-shape helpers for the audit pipeline
//!
//! An edit is only worth auditing when the value actually changed, not
//! merely its representation.

use serde_json::Number;

use crate::models::Value;

/// Whether an edit from `lhs` to `rhs` leaves the value semantically intact
///
/// - A date on either side is compared as an instant against the other
///   side's interpretation as an instant; if the other side has none the
///   values differ.
/// - A value exposing identity equality decides for itself.
/// - Numbers compare by numeric value, so `1` and `1.0` are the same.
pub fn is_equivalent(lhs: &Value, rhs: &Value) -> bool {
    if matches!(lhs, Value::DateTime(_)) || matches!(rhs, Value::DateTime(_)) {
        return match (lhs.as_instant(), rhs.as_instant()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        };
    }

    if let Some(identity) = lhs.identity() {
        return identity.identity_eq(rhs);
    }
    if let Some(identity) = rhs.identity() {
        return identity.identity_eq(lhs);
    }

    if let (Value::Number(a), Value::Number(b)) = (lhs, rhs) {
        return same_number(a, b);
    }

    lhs == rhs
}

fn same_number(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// Whether a subtree holds at least one non-null leaf
pub fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Array(items) => items.iter().any(has_content),
        Value::Object(map) => map.values().any(has_content),
        _ => true,
    }
}

/// Clone the shape of `value` with every scalar leaf replaced by null
///
/// Diffing this baseline against `value` turns one structured insertion
/// into one edit per populated leaf.
pub fn null_baseline(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(null_baseline).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, child)| (key.clone(), null_baseline(child)))
                .collect(),
        ),
        _ => Value::Null,
    }
}
