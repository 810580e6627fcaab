//! JSON Export functionality
//!
//! Wraps audit records with a header carrying schema and app versions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::audit::AuditRecord;
use crate::error::{AuditError, AuditResult};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Audit record export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub record_count: usize,

    pub records: Vec<AuditRecord>,
}

impl RecordExport {
    pub fn new(records: &[AuditRecord]) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            record_count: records.len(),
            records: records.to_vec(),
        }
    }

    /// Check that the export is internally consistent
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Unsupported schema version: {} (expected {})",
                self.schema_version, EXPORT_SCHEMA_VERSION
            ));
        }
        if self.record_count != self.records.len() {
            return Err(format!(
                "Record count mismatch: header says {}, found {}",
                self.record_count,
                self.records.len()
            ));
        }
        Ok(())
    }
}

/// Export records as pretty-printed JSON
pub fn export_records_json<W: Write>(records: &[AuditRecord], writer: &mut W) -> AuditResult<()> {
    let export = RecordExport::new(records);
    serde_json::to_writer_pretty(&mut *writer, &export)
        .map_err(|e| AuditError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| AuditError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentContext, DocumentId, Path};
    use serde_json::json;

    #[test]
    fn test_json_export_reads_back() {
        let doc = DocumentContext::new(DocumentId::new(), 2, json!({}));
        let records = vec![AuditRecord::add(&Path::from_segments(["x"]), &doc, Utc::now())];

        let mut buffer = Vec::new();
        export_records_json(&records, &mut buffer).unwrap();

        let export: RecordExport = serde_json::from_slice(&buffer).unwrap();
        export.validate().unwrap();
        assert_eq!(export.records, records);
        assert_eq!(export.app_version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_validate_rejects_count_mismatch() {
        let mut export = RecordExport::new(&[]);
        export.record_count = 3;
        assert!(export.validate().is_err());
    }
}
