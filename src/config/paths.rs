//! Path management for docaudit
//!
//! ## Path Resolution Order
//!
//! 1. `DOCAUDIT_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/docaudit` or `~/.config/docaudit`
//! 3. Windows: `%APPDATA%\docaudit`

use std::path::PathBuf;

use crate::error::AuditError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "DOCAUDIT_DATA_DIR";

/// Manages all paths used by docaudit
#[derive(Debug, Clone)]
pub struct AuditPaths {
    /// Base directory for settings and audit logs
    base_dir: PathBuf,
}

impl AuditPaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, AuditError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create AuditPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the audit log for one model (`<model>_audit.jsonl`)
    pub fn audit_log(&self, model_name: &str) -> PathBuf {
        self.base_dir.join(format!("{}_audit.jsonl", model_name))
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), AuditError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| AuditError::Io(format!("Failed to create base directory: {}", e)))
    }

    /// Check if a settings file has been written
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default base directory based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, AuditError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) => PathBuf::from(xdg),
        Err(_) => {
            let home = std::env::var("HOME").map_err(|_| {
                AuditError::Config("Could not determine HOME directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("docaudit"))
}

/// Resolve the default base directory based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, AuditError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| AuditError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("docaudit"))
}
