//! Audit record data structures
//!
//! An `AuditRecord` is one field-level change event. Records are created
//! by the normalizer and never modified afterwards; stores only append.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{DocumentContext, DocumentId, Path, RecordId, UserId, Value};

/// What happened to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// A field or array element appeared
    Add,
    /// A field's value changed
    Modify,
    /// A field or array element disappeared
    Delete,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Add => write!(f, "ADD"),
            Action::Modify => write!(f, "MODIFY"),
            Action::Delete => write!(f, "DELETE"),
        }
    }
}

/// A single audit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: RecordId,

    pub action: Action,

    /// Dot-joined location of the field (e.g. `items.0.name`)
    pub path: String,

    /// Previous value; always `None` for adds
    pub lhs: Option<String>,

    /// New value; always `None` for adds and deletes
    pub rhs: Option<String>,

    /// Document the change belongs to
    pub source_ref: DocumentId,

    /// Document version the change was computed against
    pub source_version: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Declared type of the field
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// User responsible for the change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserId>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl AuditRecord {
    fn new(
        action: Action,
        path: &Path,
        lhs: Option<String>,
        rhs: Option<String>,
        doc: &DocumentContext,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RecordId::new(),
            action,
            path: path.to_string(),
            lhs,
            rhs,
            source_ref: doc.id,
            source_version: doc.version,
            label: None,
            kind: None,
            user: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record that something appeared at `path`
    pub fn add(path: &Path, doc: &DocumentContext, now: DateTime<Utc>) -> Self {
        Self::new(Action::Add, path, None, None, doc, now)
    }

    /// Record a value change at `path`
    ///
    /// Only null maps to `None`; `0`, `""` and `false` are kept as-is.
    pub fn modify(
        path: &Path,
        lhs: &Value,
        rhs: &Value,
        doc: &DocumentContext,
        now: DateTime<Utc>,
    ) -> Self {
        Self::new(
            Action::Modify,
            path,
            audit_text(lhs),
            audit_text(rhs),
            doc,
            now,
        )
    }

    /// Record that the value at `path` went away
    pub fn delete(path: &Path, old: &Value, doc: &DocumentContext, now: DateTime<Utc>) -> Self {
        Self::new(Action::Delete, path, audit_text(old), None, doc, now)
    }

    /// Format the record for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} v{} {}",
            self.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.action,
            self.source_ref,
            self.source_version,
            self.path
        );

        if let Some(label) = &self.label {
            output.push_str(&format!(" ({})", label));
        }

        match self.action {
            Action::Modify => output.push_str(&format!(
                "\n  {} -> {}",
                self.lhs.as_deref().unwrap_or("null"),
                self.rhs.as_deref().unwrap_or("null")
            )),
            Action::Delete => {
                if let Some(lhs) = &self.lhs {
                    output.push_str(&format!("\n  was {}", lhs));
                }
            }
            Action::Add => {}
        }

        output
    }
}

fn audit_text(value: &Value) -> Option<String> {
    if value.is_null() {
        None
    } else {
        Some(value.to_audit_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> DocumentContext {
        DocumentContext::new(DocumentId::new(), 7, json!({}))
    }

    #[test]
    fn test_action_display() {
        assert_eq!(Action::Add.to_string(), "ADD");
        assert_eq!(Action::Modify.to_string(), "MODIFY");
        assert_eq!(Action::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_add_has_no_values() {
        let doc = doc();
        let record = AuditRecord::add(&Path::from_segments(["x"]), &doc, Utc::now());
        assert_eq!(record.action, Action::Add);
        assert!(record.lhs.is_none());
        assert!(record.rhs.is_none());
        assert_eq!(record.source_ref, doc.id);
        assert_eq!(record.source_version, 7);
    }

    #[test]
    fn test_modify_keeps_falsy_values() {
        let record = AuditRecord::modify(
            &Path::from_segments(["n"]),
            &Value::from(0i64),
            &Value::from(false),
            &doc(),
            Utc::now(),
        );
        assert_eq!(record.lhs.as_deref(), Some("0"));
        assert_eq!(record.rhs.as_deref(), Some("false"));

        let record = AuditRecord::modify(
            &Path::from_segments(["n"]),
            &Value::Null,
            &Value::from(""),
            &doc(),
            Utc::now(),
        );
        assert!(record.lhs.is_none());
        assert_eq!(record.rhs.as_deref(), Some(""));
    }

    #[test]
    fn test_delete_has_no_rhs() {
        let record = AuditRecord::delete(
            &Path::from_segments(["a"]),
            &Value::from("x"),
            &doc(),
            Utc::now(),
        );
        assert_eq!(record.action, Action::Delete);
        assert_eq!(record.lhs.as_deref(), Some("x"));
        assert!(record.rhs.is_none());
    }

    #[test]
    fn test_serialization_skips_absent_metadata() {
        let mut record = AuditRecord::add(&Path::from_segments(["x"]), &doc(), Utc::now());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["action"], "add");
        assert!(json.get("label").is_none());
        assert!(json.get("type").is_none());

        record.kind = Some("string".into());
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""type":"string""#));

        let deserialized: AuditRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, record);
    }

    #[test]
    fn test_human_readable_format() {
        let mut record = AuditRecord::modify(
            &Path::from_segments(["b"]),
            &Value::from(1i64),
            &Value::from(101i64),
            &doc(),
            Utc::now(),
        );
        record.label = Some("Balance".into());

        let formatted = record.format_human_readable();
        assert!(formatted.contains("MODIFY"));
        assert!(formatted.contains("v7 b (Balance)"));
        assert!(formatted.contains("1 -> 101"));
    }
}
