use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use care_audit::cli::{handle_audit_command, handle_export_command, AuditCommands};
use care_audit::config::{paths::AuditPaths, settings::Settings};
use care_audit::export::ExportFormat;
use care_audit::logging::init_logging;
use care_audit::storage::Storage;

#[derive(Parser)]
#[command(
    name = "care-audit",
    version,
    about = "Inspect and export the care-home audit trail",
    long_about = "care-audit reads the append-only audit log written by the care-home \
                  records layer. It lists, filters and exports the trail of who changed \
                  what, when and from where."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit trail inspection commands
    #[command(subcommand)]
    Audit(AuditCommands),

    /// Export all audit records
    Export {
        /// Export format
        #[arg(value_enum)]
        format: ExportFormat,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = AuditPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_logging(&settings.log_settings())?;

    let storage = Storage::new(paths.clone())?;
    debug!(base_dir = %paths.base_dir().display(), "Storage ready");

    match cli.command {
        Some(Commands::Audit(cmd)) => {
            handle_audit_command(storage.audit_log(), &settings, cmd)?;
        }
        Some(Commands::Export { format, output }) => {
            handle_export_command(storage.audit_log(), format, output)?;
        }
        Some(Commands::Config) => {
            println!("care-audit Configuration");
            println!("========================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Data directory:  {}", paths.data_dir().display());
            println!("Audit log:       {}", paths.audit_log().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Log level:     {}", settings.log_level);
            println!("  Log format:    {}", settings.log_format);
            println!("  List limit:    {}", settings.default_list_limit);
            println!("  Date format:   {}", settings.date_format);
            println!();
            println!("Audit records:   {}", storage.audit_log().entry_count()?);
        }
        None => {
            println!("care-audit - audit trail for care-home records");
            println!();
            println!("Run 'care-audit --help' for usage information.");
            println!(
                "Run 'care-audit audit list' to see the {} most recent records.",
                settings.default_list_limit
            );
        }
    }

    Ok(())
}
