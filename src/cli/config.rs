//! `docaudit config`: show or initialize configuration

use clap::Args;

use crate::config::{AuditPaths, Settings};
use crate::error::AuditResult;

/// Arguments for `docaudit config`
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Write the current settings to config.json
    #[arg(long)]
    pub init: bool,
}

/// Handle `docaudit config`
pub fn handle_config_command(
    paths: &AuditPaths,
    settings: &Settings,
    args: ConfigArgs,
) -> AuditResult<()> {
    if args.init {
        settings.save(paths)?;
        println!("Wrote settings to: {}", paths.settings_file().display());
        println!();
    }

    println!("docaudit Configuration");
    println!("======================");
    println!("Base directory: {}", paths.base_dir().display());
    println!(
        "Settings file:  {}{}",
        paths.settings_file().display(),
        if paths.is_initialized() { "" } else { " (not created)" }
    );
    println!(
        "Audit log:      {}",
        paths.audit_log(&settings.model_name).display()
    );
    println!();
    println!("Settings:");
    println!("  Model:          {}", settings.model_name);
    println!("  Ignored fields: {}", settings.ignored_fields.join(", "));
    println!("  Labels:         {}", settings.labels.len());
    println!("  Types:          {}", settings.types.len());
    println!("  Require labels: {}", settings.require_labels);
    println!(
        "  User field:     {}",
        settings.user_field.as_deref().unwrap_or("-")
    );

    Ok(())
}
