//! YAML Export functionality

use std::io::Write;

use crate::audit::AuditRecord;
use crate::error::{AuditError, AuditResult};
use crate::export::json::RecordExport;

/// Export records as YAML, preceded by a comment header
pub fn export_records_yaml<W: Write>(records: &[AuditRecord], writer: &mut W) -> AuditResult<()> {
    let export = RecordExport::new(records);

    writeln!(writer, "# docaudit record export")
        .map_err(|e| AuditError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", export.exported_at)
        .map_err(|e| AuditError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| AuditError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| AuditError::Export(e.to_string()))?;

    Ok(())
}

/// Read an export produced by `export_records_yaml`
pub fn import_from_yaml(yaml_str: &str) -> AuditResult<RecordExport> {
    let export: RecordExport =
        serde_yaml::from_str(yaml_str).map_err(|e| AuditError::Export(e.to_string()))?;
    export.validate().map_err(AuditError::Export)?;
    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentContext, DocumentId, Path, Value};
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_yaml_export_reads_back() {
        let doc = DocumentContext::new(DocumentId::new(), 5, json!({}));
        let mut record = AuditRecord::delete(
            &Path::from_segments(["memo"]),
            &Value::from("lunch"),
            &doc,
            Utc::now(),
        );
        record.label = Some("Memo".into());

        let mut buffer = Vec::new();
        export_records_yaml(&[record.clone()], &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("# docaudit record export"));

        let export = import_from_yaml(&text).unwrap();
        assert_eq!(export.records, vec![record]);
    }
}
