//! `docaudit diff`: audit the change between two snapshots of a document

use std::io;
use std::path::PathBuf;

use clap::Args;
use tracing::info;

use super::{open_trail, parse_document_id, write_records, OutputFormat};
use crate::config::{AuditPaths, Settings};
use crate::error::AuditResult;
use crate::models::DocumentContext;
use crate::storage::read_snapshot;

/// Arguments for `docaudit diff`
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// JSON snapshot of the document before the change
    pub before: PathBuf,

    /// JSON snapshot of the document after the change
    pub after: PathBuf,

    /// Document id (uuid)
    #[arg(long)]
    pub id: String,

    /// Version the document is at after the change
    #[arg(long, default_value = "0")]
    pub version: u64,

    /// Append the records to the model's audit log
    #[arg(long)]
    pub save: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Handle `docaudit diff`
pub fn handle_diff_command(
    paths: &AuditPaths,
    settings: &Settings,
    args: DiffArgs,
) -> AuditResult<()> {
    let id = parse_document_id(&args.id)?;
    let previous = read_snapshot(&args.before)?;
    let current = read_snapshot(&args.after)?;
    let doc = DocumentContext::new(id, args.version, current);

    let trail = open_trail(paths, settings)?;
    let records = if args.save {
        let records = trail.record_changes(&doc, &previous)?;
        info!(
            count = records.len(),
            log = %trail.store().path().display(),
            "saved audit records"
        );
        records
    } else {
        trail.audit_diffs(&doc, &previous)?
    };

    let stdout = io::stdout();
    write_records(&records, args.format, &mut stdout.lock())
}
