//! Export module for docaudit
//!
//! Writes audit records in several formats:
//! - CSV: one row per record (spreadsheet-compatible)
//! - JSON: machine-readable export with schema versioning
//! - YAML: human-readable export

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_records_csv;
pub use self::json::{export_records_json, RecordExport, EXPORT_SCHEMA_VERSION};
pub use self::yaml::export_records_yaml;
