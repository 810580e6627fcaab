//! Audit trail service
//!
//! Wires an audit store to the diff pipeline: compute the records for a
//! document change, persist them, and read them back by document and
//! version.

use tracing::{debug, trace};

use crate::audit::{build_audit_records, AuditOptions, AuditRecord};
use crate::error::{AuditError, AuditResult};
use crate::models::{DocumentContext, DocumentId, Path, Value};
use crate::storage::{AuditQuery, AuditStore, VersionFilter};

/// Service for computing, saving, and querying audit records
#[derive(Debug)]
pub struct AuditTrail<S> {
    store: S,
    options: AuditOptions,
}

/// Setup-time builder for `AuditTrail`
#[derive(Debug)]
pub struct AuditTrailBuilder<S> {
    store: Option<S>,
    options: AuditOptions,
}

impl<S: AuditStore> AuditTrail<S> {
    pub fn builder() -> AuditTrailBuilder<S> {
        AuditTrailBuilder {
            store: None,
            options: AuditOptions::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn options(&self) -> &AuditOptions {
        &self.options
    }

    /// Records describing how `doc` differs from its `previous` state
    ///
    /// Nothing is persisted; hand the result to `save_audit_diffs` once the
    /// document itself has been saved.
    pub fn audit_diffs(
        &self,
        doc: &DocumentContext,
        previous: &Value,
    ) -> AuditResult<Vec<AuditRecord>> {
        build_audit_records(previous, &doc.state, doc, &self.options, &Path::root())
    }

    /// Persist previously computed records
    pub fn save_audit_diffs(&self, records: &[AuditRecord]) -> AuditResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        self.store.insert_many(records)
    }

    /// Compute and persist the records for one change
    pub fn record_changes(
        &self,
        doc: &DocumentContext,
        previous: &Value,
    ) -> AuditResult<Vec<AuditRecord>> {
        let records = self.audit_diffs(doc, previous)?;
        let saved = self.save_audit_diffs(&records)?;
        for record in &records {
            trace!("{}", record.format_human_readable());
        }
        debug!(document = %doc.id, version = doc.version, saved, "recorded changes");
        Ok(records)
    }

    /// Every record of a document, newest first
    pub fn audit(&self, id: DocumentId) -> AuditResult<Vec<AuditRecord>> {
        self.store.find(&AuditQuery::for_document(id))
    }

    /// Records of a document produced at one version
    pub fn audit_version(&self, id: DocumentId, version: u64) -> AuditResult<Vec<AuditRecord>> {
        self.store
            .find(&AuditQuery::for_document(id).with_versions(VersionFilter::Exact(version)))
    }

    /// Records of a document with `min(v1, v2) <= version < max(v1, v2)`
    pub fn audit_between(
        &self,
        id: DocumentId,
        v1: u64,
        v2: u64,
    ) -> AuditResult<Vec<AuditRecord>> {
        self.store
            .find(&AuditQuery::for_document(id).with_versions(VersionFilter::Between(v1, v2)))
    }
}

impl<S: AuditStore> AuditTrailBuilder<S> {
    /// Where records are persisted (required)
    pub fn store(mut self, store: S) -> Self {
        self.store = Some(store);
        self
    }

    pub fn options(mut self, options: AuditOptions) -> Self {
        self.options = options;
        self
    }

    /// Finish setup
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Config` when no store was supplied.
    pub fn build(self) -> AuditResult<AuditTrail<S>> {
        let store = self
            .store
            .ok_or_else(|| AuditError::Config("an audit store is required".into()))?;
        Ok(AuditTrail {
            store,
            options: self.options,
        })
    }
}
