//! In-memory audit store

use std::sync::{RwLock, RwLockReadGuard};

use super::{AuditQuery, AuditStore};
use crate::audit::AuditRecord;
use crate::error::{AuditError, AuditResult};

/// Audit store holding records in process memory
#[derive(Debug, Default)]
pub struct MemoryAuditStore {
    records: RwLock<Vec<AuditRecord>>,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AuditResult<RwLockReadGuard<'_, Vec<AuditRecord>>> {
        self.records
            .read()
            .map_err(|e| AuditError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    /// Snapshot of every record, oldest first
    pub fn records(&self) -> AuditResult<Vec<AuditRecord>> {
        Ok(self.read()?.clone())
    }

    pub fn len(&self) -> AuditResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> AuditResult<bool> {
        Ok(self.read()?.is_empty())
    }
}

impl AuditStore for MemoryAuditStore {
    fn insert_many(&self, records: &[AuditRecord]) -> AuditResult<usize> {
        let mut stored = self
            .records
            .write()
            .map_err(|e| AuditError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        stored.extend_from_slice(records);
        Ok(records.len())
    }

    fn find(&self, query: &AuditQuery) -> AuditResult<Vec<AuditRecord>> {
        let stored = self.read()?;
        Ok(query.select(stored.iter()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditRecord;
    use crate::models::{DocumentContext, DocumentId, Path};
    use crate::storage::VersionFilter;
    use chrono::Utc;
    use serde_json::json;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_insert_and_find() {
        let store = MemoryAuditStore::new();
        assert!(store.is_empty().unwrap());

        let doc = DocumentContext::new(DocumentId::new(), 3, json!({}));
        let record = AuditRecord::add(&Path::from_segments(["x"]), &doc, Utc::now());
        assert_eq!(store.insert_many(&[record.clone()]).unwrap(), 1);
        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.records().unwrap(), vec![record.clone()]);

        let found = store
            .find(&AuditQuery::for_document(doc.id).with_versions(VersionFilter::Between(3, 4)))
            .unwrap();
        assert_eq!(found, vec![record]);

        let none = store
            .find(&AuditQuery::for_document(DocumentId::new()))
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_poisoned_lock_is_a_storage_error() {
        let store = Arc::new(MemoryAuditStore::new());
        let poisoner = Arc::clone(&store);
        let _ = thread::spawn(move || {
            let _guard = poisoner.records.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(store.len(), Err(AuditError::Storage(_))));
        assert!(matches!(store.is_empty(), Err(AuditError::Storage(_))));
        assert!(store.find(&AuditQuery::default()).is_err());
    }
}
