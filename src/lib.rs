//! docaudit - field-level audit trail for versioned documents
//!
//! This library compares the previous and current state of a document and
//! turns the differences into flat audit records (add/modify/delete), with
//! optional labels, types, and user attribution supplied by the caller.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `models`: document trees, paths, and strongly-typed ids
//! - `audit`: the differencer and the record-building pipeline
//! - `storage`: append-only audit stores (JSONL file, in-memory)
//! - `services`: the `AuditTrail` facade tying the pipeline to a store
//! - `config`: path resolution and settings
//! - `export` / `display`: record output for the command line
//! - `error`: custom error types
//!
//! # Example
//!
//! ```rust,ignore
//! use docaudit::{AuditTrail, DocumentContext, DocumentId, MemoryAuditStore};
//!
//! let trail = AuditTrail::builder().store(MemoryAuditStore::new()).build()?;
//! let doc = DocumentContext::new(DocumentId::new(), 2, current_state);
//! let records = trail.record_changes(&doc, &previous_state)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use audit::{build_audit_records, diff, Action, AuditOptions, AuditRecord, Change};
pub use error::{AuditError, AuditResult};
pub use models::{DocumentContext, DocumentId, Path, Value};
pub use services::{AuditTrail, AuditTrailBuilder};
pub use storage::{AuditQuery, AuditStore, JsonlAuditStore, MemoryAuditStore, VersionFilter};
