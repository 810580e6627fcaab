use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use docaudit::cli::{
    handle_config_command, handle_diff_command, handle_log_command, ConfigArgs, DiffArgs, LogArgs,
};
use docaudit::config::{AuditPaths, Settings};

/// Environment variable holding the log filter
const LOG_ENV: &str = "DOCAUDIT_LOG";

#[derive(Parser)]
#[command(
    name = "docaudit",
    version,
    about = "Field-level audit trail for versioned documents",
    long_about = "docaudit compares two snapshots of a document and turns the \
                  differences into add/modify/delete audit records, optionally \
                  appending them to a per-model audit log that can be queried \
                  by document and version."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit the change between two JSON snapshots
    Diff(DiffArgs),

    /// Show the audit records of a document
    Log(LogArgs),

    /// Show current configuration and paths
    Config(ConfigArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = AuditPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Diff(args)) => handle_diff_command(&paths, &settings, args)?,
        Some(Commands::Log(args)) => handle_log_command(&paths, &settings, args)?,
        Some(Commands::Config(args)) => handle_config_command(&paths, &settings, args)?,
        None => {
            println!("docaudit - field-level audit trail for versioned documents");
            println!();
            println!("Run 'docaudit --help' for usage information.");
        }
    }

    Ok(())
}
