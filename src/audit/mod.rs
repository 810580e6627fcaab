//! Audit diff computation for docaudit
//!
//! Turns two snapshots of a document into a flat, ordered list of
//! field-level audit records.
//!
//! # Architecture
//!
//! - `diff`: structural differencer producing raw `Change`s with paths
//!   from the document root.
//! - `equivalence`: rules that recognise representation-only edits
//!   (dates vs ISO strings, identifiers with their own equality).
//! - `normalize`: the pipeline that filters, expands, and enriches
//!   changes into `AuditRecord`s.
//! - `options`: the caller-supplied label/type/user/filter functions.
//!
//! # Example
//!
//! ```rust,ignore
//! use docaudit::audit::{build_audit_records, AuditOptions};
//! use docaudit::models::{DocumentContext, Path};
//!
//! let options = AuditOptions::new()
//!     .with_label(|path, _doc| Ok(Some(path.to_string().to_uppercase())));
//! let records = build_audit_records(&previous, &doc.state, &doc, &options, &Path::root())?;
//! ```

mod diff;
mod equivalence;
mod normalize;
mod options;
mod record;

pub use diff::{diff, diff_under, Change};
pub use equivalence::{has_content, is_equivalent, null_baseline};
pub use normalize::build_audit_records;
pub use options::{AuditOptions, FilterFn, TextFn, UserFn, DEFAULT_IGNORED_FIELDS};
pub use record::{Action, AuditRecord};
