//! CLI commands for inspecting the audit trail

use clap::Subcommand;

use crate::audit::{AuditAction, AuditFilter, AuditRecord, AuditStore, JsonlStore};
use crate::config::settings::Settings;
use crate::display::{format_record_details, format_record_table, format_trail};
use crate::error::{AuditError, AuditResult};

/// Audit subcommands
#[derive(Subcommand, Debug)]
pub enum AuditCommands {
    /// List recent audit records
    #[command(alias = "ls")]
    List {
        /// Only records about this subject type (e.g. Resident)
        #[arg(short = 't', long)]
        subject_type: Option<String>,

        /// Only records about this subject ID
        #[arg(short = 'i', long)]
        subject_id: Option<String>,

        /// Only records with this action (created, updated, login_failed, ...)
        #[arg(short, long)]
        action: Option<AuditAction>,

        /// Only records caused by this actor ID
        #[arg(long)]
        actor: Option<String>,

        /// Number of records to show (defaults to the configured limit)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show one record in detail
    Show {
        /// Record ID or a unique prefix of it
        id: String,
    },

    /// Show the full trail of one subject
    Trail {
        /// Subject type (e.g. Agency)
        subject_type: String,

        /// Subject ID
        subject_id: String,
    },
}

/// Handle audit commands
pub fn handle_audit_command(log: &JsonlStore, settings: &Settings, cmd: AuditCommands) -> AuditResult<()> {
    match cmd {
        AuditCommands::List {
            subject_type,
            subject_id,
            action,
            actor,
            limit,
        } => {
            let mut filter = AuditFilter {
                subject_type,
                subject_id,
                ..AuditFilter::new()
            }
            .with_limit(limit.unwrap_or(settings.default_list_limit));
            if let Some(action) = action {
                filter = filter.with_action(action);
            }
            if let Some(actor) = actor {
                filter = filter.with_actor(actor);
            }
            let records = filter.apply(log.records()?);
            println!("{}", format_record_table(&records, &settings.date_format));
        }
        AuditCommands::Show { id } => {
            let record = find_record(log.records()?, &id)?;
            print!("{}", format_record_details(&record));
        }
        AuditCommands::Trail {
            subject_type,
            subject_id,
        } => {
            let records = AuditFilter::subject(&subject_type, &subject_id).apply(log.records()?);
            println!(
                "{}",
                format_trail(&records, &subject_type, &subject_id, &settings.date_format).trim_end()
            );
        }
    }

    Ok(())
}

/// Find a record by full ID or unique prefix (hyphens optional)
pub fn find_record(records: Vec<AuditRecord>, id: &str) -> AuditResult<AuditRecord> {
    let needle = id.trim().to_lowercase().replace('-', "");
    if needle.is_empty() {
        return Err(AuditError::Validation("Record ID cannot be empty".into()));
    }

    let mut matches: Vec<AuditRecord> = records
        .into_iter()
        .filter(|r| r.id.simple().to_string().starts_with(&needle))
        .collect();

    match matches.len() {
        0 => Err(AuditError::record_not_found(id)),
        1 => Ok(matches.remove(0)),
        n => Err(AuditError::Validation(format!(
            "Record ID prefix '{}' is ambiguous ({} matches)",
            id, n
        ))),
    }
}
