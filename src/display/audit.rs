//! Audit record display formatting
//!
//! Formats audit records for terminal output in table and detail views.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tabled::{settings::Style, Table, Tabled};

use crate::audit::{format_value, generate_diff, AuditAction, AuditRecord};

/// Used when the configured timestamp format cannot be rendered
const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Actor")]
    actor: String,
    #[tabled(rename = "Summary")]
    summary: String,
    #[tabled(rename = "ID")]
    id: String,
}

impl RecordRow {
    fn new(record: &AuditRecord, date_format: &str) -> Self {
        Self {
            when: format_timestamp(&record.occurred_at, date_format),
            action: record.action.to_string(),
            subject: subject_label(record),
            actor: record.actor_id.clone().unwrap_or_else(|| "-".to_string()),
            summary: record.summary.clone(),
            id: short_id(record),
        }
    }
}

/// Format a list of audit records as a table
pub fn format_record_table(records: &[AuditRecord], date_format: &str) -> String {
    if records.is_empty() {
        return "No audit records found.".to_string();
    }

    let rows: Vec<RecordRow> = records.iter().map(|r| RecordRow::new(r, date_format)).collect();
    Table::new(rows).with(Style::psql()).to_string()
}

/// Format the trail of a single subject
pub fn format_trail(
    records: &[AuditRecord],
    subject_type: &str,
    subject_id: &str,
    date_format: &str,
) -> String {
    if records.is_empty() {
        return format!("No audit records for {} #{}.", subject_type, subject_id);
    }

    let mut output = format!(
        "Audit trail for {} #{} ({} records)\n\n",
        subject_type,
        subject_id,
        records.len()
    );

    for record in records {
        output.push_str(&format!(
            "{}  {:<8}  {}\n",
            format_timestamp(&record.occurred_at, date_format),
            record.action,
            record.summary
        ));
        if record.action == AuditAction::Updated {
            if let Some(diff) = generate_diff(&record.before, &record.after) {
                output.push_str(&format!("    {}\n", diff));
            }
        }
    }

    output
}

/// Format audit record details for display
pub fn format_record_details(record: &AuditRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("Record:   {}\n", record.id));
    output.push_str(&format!(
        "When:     {}\n",
        record.occurred_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output.push_str(&format!("Action:   {}\n", record.action));
    output.push_str(&format!("Subject:  {}\n", subject_label(record)));
    output.push_str(&format!(
        "Actor:    {}\n",
        record.actor_id.as_deref().unwrap_or("(none)")
    ));
    output.push_str(&format!(
        "Address:  {}\n",
        record.origin_address.as_deref().unwrap_or("(unknown)")
    ));
    output.push_str(&format!(
        "Agent:    {}\n",
        record.origin_agent.as_deref().unwrap_or("(unknown)")
    ));
    output.push_str(&format!("Summary:  {}\n", record.summary));

    let fields = record.changed_fields();
    if !fields.is_empty() {
        output.push_str("\nValues:\n");
        let width = fields.iter().map(|f| f.len()).max().unwrap_or(0);
        for field in fields {
            output.push_str(&format!(
                "  {:<width$}  {} -> {}\n",
                field,
                side_value(record.before.get(field)),
                side_value(record.after.get(field)),
                width = width
            ));
        }
    }

    output
}

/// Render `at` with a user-supplied strftime format
///
/// chrono reports unknown specifiers as a formatting error, which would
/// panic in `to_string`; such formats fall back to the default.
fn format_timestamp(at: &DateTime<Utc>, date_format: &str) -> String {
    let mut rendered = String::new();
    match write!(rendered, "{}", at.format(date_format)) {
        Ok(()) => rendered,
        Err(_) => at.format(FALLBACK_DATE_FORMAT).to_string(),
    }
}

fn subject_label(record: &AuditRecord) -> String {
    match &record.subject_id {
        Some(id) => format!("{} #{}", record.subject_type, id),
        None => record.subject_type.clone(),
    }
}

fn short_id(record: &AuditRecord) -> String {
    record.id.simple().to_string()[..8].to_string()
}

fn side_value(value: Option<&Value>) -> String {
    value.map(format_value).unwrap_or_else(|| "-".to_string())
}
