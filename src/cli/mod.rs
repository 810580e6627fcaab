//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the audit trail service.

pub mod config;
pub mod diff;
pub mod log;

pub use config::{handle_config_command, ConfigArgs};
pub use diff::{handle_diff_command, DiffArgs};
pub use log::{handle_log_command, LogArgs};

use std::io::Write;

use clap::ValueEnum;

use crate::audit::{AuditOptions, AuditRecord};
use crate::config::{AuditPaths, Settings};
use crate::display::{format_record_details, format_record_list};
use crate::error::{AuditError, AuditResult};
use crate::export::{export_records_csv, export_records_json, export_records_yaml};
use crate::models::DocumentId;
use crate::services::AuditTrail;
use crate::storage::JsonlAuditStore;

/// Output format for audit records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Terminal table
    #[default]
    Table,
    /// One block per record with every field
    Details,
    /// JSON export with schema versioning
    Json,
    /// CSV, one row per record
    Csv,
    /// YAML export
    Yaml,
}

/// Write `records` to `writer` in the requested format
pub fn write_records<W: Write>(
    records: &[AuditRecord],
    format: OutputFormat,
    writer: &mut W,
) -> AuditResult<()> {
    match format {
        OutputFormat::Table => writeln!(writer, "{}", format_record_list(records))?,
        OutputFormat::Details => {
            if records.is_empty() {
                writeln!(writer, "{}", format_record_list(records))?;
            }
            for record in records {
                writeln!(writer, "{}", format_record_details(record))?;
            }
        }
        OutputFormat::Json => export_records_json(records, writer)?,
        OutputFormat::Csv => export_records_csv(records, writer)?,
        OutputFormat::Yaml => export_records_yaml(records, writer)?,
    }
    Ok(())
}

/// Parse a document id given on the command line
///
/// Accepts a bare uuid or one carrying the `doc-` display prefix.
pub fn parse_document_id(raw: &str) -> AuditResult<DocumentId> {
    DocumentId::parse(raw.trim())
        .map_err(|e| AuditError::Validation(format!("Invalid document id '{}': {}", raw, e)))
}

/// Audit trail over the model's JSONL log, configured from settings
fn open_trail(paths: &AuditPaths, settings: &Settings) -> AuditResult<AuditTrail<JsonlAuditStore>> {
    AuditTrail::builder()
        .store(JsonlAuditStore::new(paths.audit_log(&settings.model_name)))
        .options(AuditOptions::from_settings(settings))
        .build()
}
