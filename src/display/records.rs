//! Audit record display formatting
//!
//! Formats audit records for terminal output in table and detail views.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::audit::AuditRecord;

/// Longest value shown in a table cell
const MAX_CELL_WIDTH: usize = 40;

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "Version")]
    version: u64,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Before")]
    lhs: String,
    #[tabled(rename = "After")]
    rhs: String,
    #[tabled(rename = "When")]
    created_at: String,
}

impl From<&AuditRecord> for RecordRow {
    fn from(record: &AuditRecord) -> Self {
        Self {
            version: record.source_version,
            action: record.action.to_string(),
            path: record.path.clone(),
            label: record.label.clone().unwrap_or_default(),
            lhs: cell(record.lhs.as_deref()),
            rhs: cell(record.rhs.as_deref()),
            created_at: record.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

fn cell(value: Option<&str>) -> String {
    match value {
        None => "-".to_string(),
        Some(s) if s.chars().count() > MAX_CELL_WIDTH => {
            let head: String = s.chars().take(MAX_CELL_WIDTH - 3).collect();
            format!("{}...", head)
        }
        Some(s) => s.to_string(),
    }
}

/// Format a list of records as a table
pub fn format_record_list(records: &[AuditRecord]) -> String {
    if records.is_empty() {
        return "No audit records found.".to_string();
    }

    let rows: Vec<RecordRow> = records.iter().map(RecordRow::from).collect();
    let mut output = Table::new(rows).with(Style::psql()).to_string();
    output.push_str(&format!("\n\nTotal: {} records", records.len()));
    output
}

/// Format one record with every field
pub fn format_record_details(record: &AuditRecord) -> String {
    let mut output = String::new();
    output.push_str(&format!("Record:   {}\n", record.id));
    output.push_str(&format!("Action:   {}\n", record.action));
    output.push_str(&format!("Path:     {}\n", record.path));
    output.push_str(&format!(
        "Document: {} (v{})\n",
        record.source_ref, record.source_version
    ));
    if let Some(label) = &record.label {
        output.push_str(&format!("Label:    {}\n", label));
    }
    if let Some(kind) = &record.kind {
        output.push_str(&format!("Type:     {}\n", kind));
    }
    if let Some(user) = &record.user {
        output.push_str(&format!("User:     {}\n", user));
    }
    output.push_str(&format!("Before:   {}\n", record.lhs.as_deref().unwrap_or("-")));
    output.push_str(&format!("After:    {}\n", record.rhs.as_deref().unwrap_or("-")));
    output.push_str(&format!(
        "Created:  {}\n",
        record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentContext, DocumentId, Path, Value};
    use chrono::Utc;
    use serde_json::json;

    fn record(lhs: &str) -> AuditRecord {
        let doc = DocumentContext::new(DocumentId::new(), 2, json!({}));
        AuditRecord::modify(
            &Path::from_segments(["memo"]),
            &Value::from(lhs),
            &Value::Null,
            &doc,
            Utc::now(),
        )
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_record_list(&[]), "No audit records found.");
    }

    #[test]
    fn test_list_contains_rows() {
        let output = format_record_list(&[record("old memo")]);
        assert!(output.contains("MODIFY"));
        assert!(output.contains("memo"));
        assert!(output.contains("old memo"));
        assert!(output.contains("Total: 1 records"));
    }

    #[test]
    fn test_long_values_are_truncated() {
        let long = "a".repeat(100);
        let output = format_record_list(&[record(&long)]);
        assert!(output.contains("..."));
        assert!(!output.contains(&long));
    }

    #[test]
    fn test_details() {
        let mut rec = record("x");
        rec.kind = Some("string".into());
        let output = format_record_details(&rec);
        assert!(output.contains("Action:   MODIFY"));
        assert!(output.contains("Type:     string"));
        assert!(output.contains("After:    -"));
        assert!(!output.contains("Label:"));
    }
}
