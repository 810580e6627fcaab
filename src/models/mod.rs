//! Core data models for docaudit
//!
//! - `ids`: strongly-typed uuid identifiers
//! - `path`: immutable locations inside a document tree
//! - `value`: the document tree itself
//! - `document`: the audited document's identity and state

pub mod document;
pub mod ids;
pub mod path;
pub mod value;

pub use document::DocumentContext;
pub use ids::{DocumentId, RecordId, UserId};
pub use path::{Path, Segment};
pub use value::{IdentityEq, ObjectRef, Value};
