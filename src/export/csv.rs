//! CSV Export functionality
//!
//! One row per audit record, newest first as returned by the store.

use std::io::Write;

use serde::Serialize;

use crate::audit::AuditRecord;
use crate::error::{AuditError, AuditResult};

#[derive(Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Created")]
    created_at: String,
    #[serde(rename = "Document")]
    source_ref: String,
    #[serde(rename = "Version")]
    source_version: u64,
    #[serde(rename = "Action")]
    action: String,
    #[serde(rename = "Path")]
    path: &'a str,
    #[serde(rename = "Label")]
    label: &'a str,
    #[serde(rename = "Type")]
    kind: &'a str,
    #[serde(rename = "Before")]
    lhs: &'a str,
    #[serde(rename = "After")]
    rhs: &'a str,
    #[serde(rename = "User")]
    user: String,
}

impl<'a> From<&'a AuditRecord> for CsvRow<'a> {
    fn from(record: &'a AuditRecord) -> Self {
        Self {
            created_at: record.created_at.to_rfc3339(),
            source_ref: record.source_ref.as_uuid().to_string(),
            source_version: record.source_version,
            action: record.action.to_string(),
            path: &record.path,
            label: record.label.as_deref().unwrap_or(""),
            kind: record.kind.as_deref().unwrap_or(""),
            lhs: record.lhs.as_deref().unwrap_or(""),
            rhs: record.rhs.as_deref().unwrap_or(""),
            user: record
                .user
                .map(|u| u.as_uuid().to_string())
                .unwrap_or_default(),
        }
    }
}

/// Export records to CSV with a header row
pub fn export_records_csv<W: Write>(records: &[AuditRecord], writer: &mut W) -> AuditResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for record in records {
        csv_writer
            .serialize(CsvRow::from(record))
            .map_err(|e| AuditError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| AuditError::Export(e.to_string()))?;
    Ok(())
}
