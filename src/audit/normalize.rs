//! Turning raw differences into audit records
//!
//! Each change from the differencer passes through, in order:
//!
//! 1. noise suppression (bookkeeping fields at the top level)
//! 2. the equivalence filter (edits that only change representation)
//! 3. the label gate (changes without a label are not audit-worthy)
//! 4. record construction: array removals and empty insertions are
//!    dropped, structured insertions expand leaf by leaf
//! 5. metadata attachment (label, type, user)
//! 6. the inclusion filter
//!
//! The whole computation is pure. The first enrichment error aborts it and
//! is returned as-is, so callers never see a partial record list.

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use super::diff::{diff_under, Change};
use super::equivalence::{has_content, is_equivalent, null_baseline};
use super::options::AuditOptions;
use super::record::AuditRecord;
use crate::error::AuditResult;
use crate::models::{DocumentContext, Path, Value};

/// Build the audit records describing the move from `before` to `after`
///
/// `base` is the location of both trees inside the document; pass
/// `Path::root()` for whole-document snapshots.
pub fn build_audit_records(
    before: &Value,
    after: &Value,
    doc: &DocumentContext,
    options: &AuditOptions,
    base: &Path,
) -> AuditResult<Vec<AuditRecord>> {
    let normalizer = Normalizer {
        doc,
        options,
        now: Utc::now(),
    };
    let mut records = Vec::new();
    normalizer.run(before, after, base, &mut records)?;

    debug!(
        document = %doc.id,
        version = doc.version,
        records = records.len(),
        "built audit records"
    );
    Ok(records)
}

struct Normalizer<'a> {
    doc: &'a DocumentContext,
    options: &'a AuditOptions,
    /// Shared by every record of one computation
    now: DateTime<Utc>,
}

impl Normalizer<'_> {
    fn run(
        &self,
        before: &Value,
        after: &Value,
        base: &Path,
        out: &mut Vec<AuditRecord>,
    ) -> AuditResult<()> {
        for change in diff_under(base, before, after) {
            self.normalize(&change, out)?;
        }
        Ok(())
    }

    fn normalize(&self, change: &Change, out: &mut Vec<AuditRecord>) -> AuditResult<()> {
        let path = change.path();
        trace!(path = %path, change = change.kind(), "normalizing change");

        if self.options.is_ignored(path) {
            trace!(path = %path, "skipping bookkeeping field");
            return Ok(());
        }

        if let Change::Edited { lhs, rhs, .. } = change {
            if is_equivalent(lhs, rhs) {
                trace!(path = %path, "skipping representation-only edit");
                return Ok(());
            }
        }

        // Only insertions and removals are wrapped as array elements
        if let Change::ArrayElement { change: inner, .. } = change {
            if let Change::Edited { .. } = inner.as_ref() {
                return self.normalize(inner, out);
            }
        }

        let label = match &self.options.label {
            Some(label_fn) => match label_fn(path, self.doc)? {
                Some(label) if !label.is_empty() => Some(label),
                _ => {
                    trace!(path = %path, "skipping unlabelled change");
                    return Ok(());
                }
            },
            None => None,
        };

        // Array removals and empty insertions carry nothing worth auditing
        let added = match change {
            Change::ArrayElement { change: inner, .. } => match inner.as_ref() {
                Change::Added { value, .. } => Some(value),
                _ => {
                    trace!(path = %path, "skipping array element removal");
                    return Ok(());
                }
            },
            Change::Added { value, .. } => Some(value),
            _ => None,
        };
        if let Some(value) = added {
            if !has_content(value) {
                trace!(path = %path, "skipping empty insertion");
                return Ok(());
            }
        }

        let mut record = match change {
            Change::Edited { lhs, rhs, .. } => AuditRecord::modify(path, lhs, rhs, self.doc, self.now),
            Change::Deleted { value, .. } => AuditRecord::delete(path, value, self.doc, self.now),
            Change::Added { .. } | Change::ArrayElement { .. } => {
                AuditRecord::add(path, self.doc, self.now)
            }
        };

        record.label = label;
        if let Some(type_fn) = &self.options.kind {
            record.kind = type_fn(path, self.doc)?;
        }
        if let Some(user_fn) = &self.options.user {
            record.user = user_fn(path, self.doc)?;
        }

        if let Some(filter_fn) = &self.options.filter {
            if !filter_fn(&record, path, self.doc)? {
                trace!(path = %path, "record rejected by filter");
                return Ok(());
            }
        }

        out.push(record);

        // An insertion is followed by one record per populated leaf
        if let Some(value) = added {
            self.run(&null_baseline(value), value, path, out)?;
        }

        Ok(())
    }
}
