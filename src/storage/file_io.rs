//! File I/O for snapshots and settings
//!
//! Snapshots are read whole; settings are written atomically (temp file,
//! then rename) so a crash never leaves a half-written config behind.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::AuditError;
use crate::models::Value;

/// Read a document snapshot from a JSON file
///
/// Extended `{"$date": ..}` / `{"$oid": ..}` forms decode to dates and
/// references.
pub fn read_snapshot<P: AsRef<Path>>(path: P) -> Result<Value, AuditError> {
    let path = path.as_ref();

    let file = File::open(path).map_err(|e| {
        AuditError::Io(format!("Failed to open snapshot {}: {}", path.display(), e))
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        AuditError::Json(format!("Failed to parse snapshot {}: {}", path.display(), e))
    })
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), AuditError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            AuditError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| AuditError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| AuditError::Storage(format!("Failed to serialize data: {}", e)))?;
    writer
        .flush()
        .map_err(|e| AuditError::Storage(format!("Failed to flush data: {}", e)))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| AuditError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        AuditError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}
