//! Storage layer for audit records
//!
//! Records are append-only: stores insert batches and answer queries, but
//! never update or remove what they hold.
//!
//! - `JsonlAuditStore`: one JSON object per line in an append-only file
//! - `MemoryAuditStore`: in-process store for tests and embedding

pub mod file_io;
pub mod jsonl;
pub mod memory;

pub use file_io::{read_snapshot, write_json_atomic};
pub use jsonl::JsonlAuditStore;
pub use memory::MemoryAuditStore;

use crate::audit::AuditRecord;
use crate::error::AuditResult;
use crate::models::DocumentId;

/// Persistence collaborator for audit records
pub trait AuditStore: Send + Sync {
    /// Append all records, returning how many were persisted
    fn insert_many(&self, records: &[AuditRecord]) -> AuditResult<usize>;

    /// Records matching `query`, newest first
    fn find(&self, query: &AuditQuery) -> AuditResult<Vec<AuditRecord>>;
}

/// Which document versions a query covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionFilter {
    #[default]
    Any,
    Exact(u64),
    /// Half-open range between two versions, in either order
    Between(u64, u64),
}

impl VersionFilter {
    pub fn matches(&self, version: u64) -> bool {
        match *self {
            VersionFilter::Any => true,
            VersionFilter::Exact(v) => version == v,
            VersionFilter::Between(a, b) => {
                let (low, high) = (a.min(b), a.max(b));
                version >= low && version < high
            }
        }
    }
}

/// Selection of audit records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuditQuery {
    /// Restrict to one document; `None` selects every document
    pub source: Option<DocumentId>,
    pub versions: VersionFilter,
}

impl AuditQuery {
    /// Every record of one document
    pub fn for_document(source: DocumentId) -> Self {
        Self {
            source: Some(source),
            versions: VersionFilter::Any,
        }
    }

    pub fn with_versions(mut self, versions: VersionFilter) -> Self {
        self.versions = versions;
        self
    }

    pub fn matches(&self, record: &AuditRecord) -> bool {
        self.source.map_or(true, |id| record.source_ref == id)
            && self.versions.matches(record.source_version)
    }

    /// Filter `records` (oldest first) and order them newest first
    ///
    /// Records sharing a creation time keep reverse insertion order.
    pub fn select<'a, I>(&self, records: I) -> Vec<AuditRecord>
    where
        I: IntoIterator<Item = &'a AuditRecord>,
        I::IntoIter: DoubleEndedIterator,
    {
        let mut selected: Vec<AuditRecord> = records
            .into_iter()
            .rev()
            .filter(|record| self.matches(record))
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        selected
    }
}
