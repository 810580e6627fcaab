//! User settings for docaudit
//!
//! Controls which model the audit log belongs to, which fields count as
//! bookkeeping, and how records are labelled, typed, and attributed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::paths::AuditPaths;
use crate::audit::DEFAULT_IGNORED_FIELDS;
use crate::error::AuditError;
use crate::storage::write_json_atomic;

/// User settings for docaudit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Name of the audited model; the audit log is `<model_name>_audit.jsonl`
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Top-level fields whose changes are never audited
    #[serde(default = "default_ignored_fields")]
    pub ignored_fields: Vec<String>,

    /// Human-readable labels keyed by path or pattern (`items.*.name`)
    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    /// Declared field types keyed by path or pattern
    #[serde(default)]
    pub types: BTreeMap<String, String>,

    /// Drop changes to fields without a label even when `labels` is empty
    #[serde(default)]
    pub require_labels: bool,

    /// Top-level field of the document holding the editing user's id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_field: Option<String>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_model_name() -> String {
    "document".to_string()
}

fn default_ignored_fields() -> Vec<String> {
    DEFAULT_IGNORED_FIELDS.iter().map(|f| f.to_string()).collect()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            model_name: default_model_name(),
            ignored_fields: default_ignored_fields(),
            labels: BTreeMap::new(),
            types: BTreeMap::new(),
            require_labels: false,
            user_field: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &AuditPaths) -> Result<Self, AuditError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                AuditError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                AuditError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            if settings.model_name.trim().is_empty() {
                return Err(AuditError::Config("model_name cannot be empty".into()));
            }

            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to disk atomically
    pub fn save(&self, paths: &AuditPaths) -> Result<(), AuditError> {
        paths.ensure_directories()?;

        write_json_atomic(paths.settings_file(), self)
    }
}
