//! Configuration module for docaudit
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Settings persistence (model name, ignored fields, labels, types)

pub mod paths;
pub mod settings;

pub use paths::AuditPaths;
pub use settings::Settings;
