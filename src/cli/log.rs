//! `docaudit log`: read back the audit records of a document

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Args;

use super::{open_trail, parse_document_id, write_records, OutputFormat};
use crate::config::{AuditPaths, Settings};
use crate::error::{AuditError, AuditResult};

/// Arguments for `docaudit log`
#[derive(Args, Debug)]
pub struct LogArgs {
    /// Document id (uuid)
    pub id: String,

    /// Only records produced at this version
    #[arg(long, conflicts_with = "between")]
    pub version: Option<u64>,

    /// Only records with versions in [min, max) of the two given
    #[arg(long, num_args = 2, value_names = ["V1", "V2"])]
    pub between: Option<Vec<u64>>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Handle `docaudit log`
///
/// An unfiltered query for a document with no records at all is reported as
/// not found; a version filter that matches nothing prints an empty result.
pub fn handle_log_command(paths: &AuditPaths, settings: &Settings, args: LogArgs) -> AuditResult<()> {
    let id = parse_document_id(&args.id)?;
    let trail = open_trail(paths, settings)?;

    let records = match (args.version, args.between.as_deref()) {
        (Some(version), _) => trail.audit_version(id, version)?,
        (None, Some(&[v1, v2])) => trail.audit_between(id, v1, v2)?,
        (None, Some(other)) => {
            return Err(AuditError::Validation(format!(
                "--between takes two versions, got {}",
                other.len()
            )))
        }
        (None, None) => {
            let records = trail.audit(id)?;
            if records.is_empty() {
                return Err(AuditError::document_not_found(id.as_uuid().to_string()));
            }
            records
        }
    };

    match args.output {
        Some(output) => {
            let file = File::create(&output).map_err(|e| {
                AuditError::Export(format!(
                    "Failed to create file {}: {}",
                    output.display(),
                    e
                ))
            })?;
            let mut writer = BufWriter::new(file);
            write_records(&records, args.format, &mut writer)?;
            writer.flush()?;
            println!("Exported {} records to: {}", records.len(), output.display());
            Ok(())
        }
        None => {
            let stdout = io::stdout();
            write_records(&records, args.format, &mut stdout.lock())
        }
    }
}
