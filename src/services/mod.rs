//! Service layer for docaudit
//!
//! The service layer ties the diff pipeline to a storage backend.

pub mod audit_trail;

pub use audit_trail::{AuditTrail, AuditTrailBuilder};
