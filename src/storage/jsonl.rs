//! Append-only JSON-lines audit store
//!
//! Each record is written as a single JSON line. A batch is written in one
//! pass and flushed once at the end.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use tracing::{debug, info};

use super::{AuditQuery, AuditStore};
use crate::audit::AuditRecord;
use crate::error::{AuditError, AuditResult};

/// Audit store backed by a JSONL file
#[derive(Debug, Clone)]
pub struct JsonlAuditStore {
    /// Path to the audit log file
    log_path: PathBuf,
}

impl JsonlAuditStore {
    /// Create a store that reads and appends to `log_path`
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Read all records from the log file, oldest first
    pub fn read_all(&self) -> AuditResult<Vec<AuditRecord>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| AuditError::Io(format!("Failed to open audit log: {}", e)))?;

        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                AuditError::Io(format!("Failed to read audit log line {}: {}", line_num + 1, e))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let record: AuditRecord = serde_json::from_str(&line).map_err(|e| {
                AuditError::Storage(format!(
                    "Failed to parse audit record at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            records.push(record);
        }

        Ok(records)
    }

    /// Number of records in the log
    pub fn record_count(&self) -> AuditResult<usize> {
        Ok(self.read_all()?.len())
    }

    /// Check if the audit log file exists
    pub fn exists(&self) -> bool {
        self.log_path.exists()
    }

    /// Get the path to the audit log file
    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }
}

impl AuditStore for JsonlAuditStore {
    fn insert_many(&self, records: &[AuditRecord]) -> AuditResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        if let Some(parent) = self.log_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AuditError::Io(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        // Serialize everything first so a bad record never leaves a partial batch
        let lines = records
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AuditError::Json(format!("Failed to serialize audit record: {}", e)))?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| AuditError::Io(format!("Failed to open audit log: {}", e)))?;
        let mut writer = BufWriter::new(file);

        for line in &lines {
            writeln!(writer, "{}", line)
                .map_err(|e| AuditError::Io(format!("Failed to write audit record: {}", e)))?;
        }

        writer
            .flush()
            .map_err(|e| AuditError::Io(format!("Failed to flush audit log: {}", e)))?;

        info!(
            path = %self.log_path.display(),
            count = records.len(),
            "appended audit records"
        );
        Ok(records.len())
    }

    fn find(&self, query: &AuditQuery) -> AuditResult<Vec<AuditRecord>> {
        let records = self.read_all()?;
        let selected = query.select(&records);
        debug!(
            path = %self.log_path.display(),
            scanned = records.len(),
            matched = selected.len(),
            "queried audit log"
        );
        Ok(selected)
    }
}
