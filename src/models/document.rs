//! The document whose changes are being audited

use serde::{Deserialize, Serialize};

use super::ids::DocumentId;
use super::value::Value;

/// Identity, version, and current state of an audited document
///
/// The version counter is owned by whatever persists the document; it is
/// copied onto every audit record so changes can later be grouped by the
/// save that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentContext {
    pub id: DocumentId,
    pub version: u64,
    /// Current serialized state of the document
    #[serde(default)]
    pub state: Value,
}

impl DocumentContext {
    pub fn new(id: DocumentId, version: u64, state: impl Into<Value>) -> Self {
        Self {
            id,
            version,
            state: state.into(),
        }
    }

    /// Look up a top-level field of the current state
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.state.get(key)
    }
}
