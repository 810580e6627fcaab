//! Document tree values
//!
//! `Value` is the shape every audited document is reduced to before it is
//! compared: scalars, ordered sequences, and mappings. Besides the plain
//! JSON scalars it carries two richer leaf types that the audit pipeline
//! treats specially: UTC instants and references to other documents.
//!
//! Snapshots read from JSON use the extended forms `{"$date": "..."}` and
//! `{"$oid": "..."}` (optionally with `"$ref": "<collection>"`) to carry
//! those leaves.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number};
use uuid::Uuid;

/// Capability for identifier types that define their own notion of equality
///
/// Two values may differ structurally (extra metadata, a different
/// textual form) yet designate the same entity. The equivalence filter
/// asks this capability instead of comparing field by field.
pub trait IdentityEq {
    /// Whether `other` designates the same entity as `self`
    fn identity_eq(&self, other: &Value) -> bool;
}

/// A reference to another document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub id: Uuid,
    /// Collection the referenced document lives in, when known
    pub collection: Option<String>,
}

impl ObjectRef {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            collection: None,
        }
    }

    pub fn in_collection(id: Uuid, collection: impl Into<String>) -> Self {
        Self {
            id,
            collection: Some(collection.into()),
        }
    }
}

impl IdentityEq for ObjectRef {
    fn identity_eq(&self, other: &Value) -> bool {
        match other {
            Value::Reference(other) => other.id == self.id,
            Value::String(s) => Uuid::parse_str(s).map(|id| id == self.id).unwrap_or(false),
            _ => false,
        }
    }
}

/// A node of a document tree
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    DateTime(DateTime<Utc>),
    Reference(ObjectRef),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether this is a mapping or a sequence
    pub fn is_structured(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    /// Look up a field of a mapping
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Identity-equality capability exposed by this value, if any
    pub fn identity(&self) -> Option<&dyn IdentityEq> {
        match self {
            Value::Reference(reference) => Some(reference),
            _ => None,
        }
    }

    /// Interpret this value as an absolute instant
    ///
    /// Dates are themselves; strings are parsed as RFC 3339 timestamps or
    /// bare `YYYY-MM-DD` dates (midnight UTC); numbers are milliseconds
    /// since the Unix epoch.
    pub fn as_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            Value::String(s) => parse_instant(s),
            Value::Number(n) => n
                .as_i64()
                .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
            _ => None,
        }
    }

    /// Render the value the way it is stored in an audit record
    pub fn to_audit_string(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
            Value::Reference(reference) => reference.id.to_string(),
            Value::Array(_) | Value::Object(_) => serde_json::Value::from(self).to_string(),
        }
    }
}

fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_audit_string())
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                if let Some(value) = decode_extended(&map) {
                    return value;
                }
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

/// Decode `{"$date": ..}` and `{"$oid": .., "$ref"?: ..}` wrappers
fn decode_extended(map: &Map<String, serde_json::Value>) -> Option<Value> {
    match (map.len(), map.get("$date"), map.get("$oid")) {
        (1, Some(serde_json::Value::String(s)), None) => parse_instant(s).map(Value::DateTime),
        (1, Some(serde_json::Value::Number(n)), None) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
            .map(Value::DateTime),
        (len, None, Some(serde_json::Value::String(s))) if len <= 2 => {
            let id = Uuid::parse_str(s).ok()?;
            match map.get("$ref") {
                Some(serde_json::Value::String(collection)) => {
                    Some(Value::Reference(ObjectRef::in_collection(id, collection.clone())))
                }
                None if len == 1 => Some(Value::Reference(ObjectRef::new(id))),
                _ => None,
            }
        }
        _ => None,
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::DateTime(dt) => serde_json::json!({
                "$date": dt.to_rfc3339_opts(SecondsFormat::Millis, true)
            }),
            Value::Reference(reference) => {
                let mut map = Map::new();
                map.insert(
                    "$oid".to_string(),
                    serde_json::Value::String(reference.id.to_string()),
                );
                if let Some(collection) = &reference.collection {
                    map.insert(
                        "$ref".to_string(),
                        serde_json::Value::String(collection.clone()),
                    );
                }
                serde_json::Value::Object(map)
            }
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde_json::Value::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<ObjectRef> for Value {
    fn from(reference: ObjectRef) -> Self {
        Value::Reference(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_plain_json() {
        let value = Value::from(json!({"a": "x", "b": [1, null], "c": {"d": true}}));
        assert_eq!(value.get("a"), Some(&Value::from("x")));
        assert!(value.get("b").unwrap().is_structured());
        assert_eq!(value.get("c").unwrap().get("d"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_extended_date_and_oid() {
        let id = "550e8400-e29b-41d4-a716-446655440000";
        let value = Value::from(json!({
            "when": {"$date": "2024-01-01T00:00:00Z"},
            "owner": {"$oid": id, "$ref": "users"},
            "plain": {"$oid": "not-a-uuid"}
        }));

        assert!(matches!(value.get("when"), Some(Value::DateTime(_))));
        match value.get("owner") {
            Some(Value::Reference(r)) => {
                assert_eq!(r.id.to_string(), id);
                assert_eq!(r.collection.as_deref(), Some("users"));
            }
            other => panic!("expected reference, got {:?}", other),
        }
        // An unparseable id stays an ordinary mapping
        assert!(matches!(value.get("plain"), Some(Value::Object(_))));
    }

    #[test]
    fn test_json_round_trip_keeps_rich_leaves() {
        let original = Value::from(json!({
            "when": {"$date": "2024-03-05T10:20:30.123Z"},
            "owner": {"$oid": "550e8400-e29b-41d4-a716-446655440000"}
        }));
        let text = serde_json::to_string(&original).unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_as_instant() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(Value::from(dt).as_instant(), Some(dt));
        assert_eq!(Value::from("2024-01-01T00:00:00.000Z").as_instant(), Some(dt));
        assert_eq!(Value::from("2024-01-01").as_instant(), Some(dt));
        assert_eq!(Value::from(1_704_067_200_000i64).as_instant(), Some(dt));
        assert_eq!(Value::from("yesterday").as_instant(), None);
        assert_eq!(Value::Bool(true).as_instant(), None);
    }

    #[test]
    fn test_reference_identity_eq() {
        let id = Uuid::new_v4();
        let plain = ObjectRef::new(id);
        let tagged = ObjectRef::in_collection(id, "users");

        assert_ne!(Value::from(plain.clone()), Value::from(tagged.clone()));
        assert!(plain.identity_eq(&Value::from(tagged)));
        assert!(plain.identity_eq(&Value::from(id.to_string())));
        assert!(!plain.identity_eq(&Value::from(ObjectRef::new(Uuid::new_v4()))));
        assert!(!plain.identity_eq(&Value::Null));
    }

    #[test]
    fn test_to_audit_string() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(Value::from(0i64).to_audit_string(), "0");
        assert_eq!(Value::from(false).to_audit_string(), "false");
        assert_eq!(Value::from("").to_audit_string(), "");
        assert_eq!(Value::from(dt).to_audit_string(), "2024-01-01T00:00:00.000Z");
        assert_eq!(
            Value::from(json!({"b": 1, "a": [true]})).to_audit_string(),
            r#"{"a":[true],"b":1}"#
        );
    }
}
