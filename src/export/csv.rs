//! CSV Export functionality
//!
//! One row per audit record. Captured values are written as compact JSON
//! objects so spreadsheets keep one column per side.

use std::io::Write;

use crate::audit::{Attributes, AuditRecord};
use crate::error::{AuditError, AuditResult};

const HEADER: [&str; 11] = [
    "ID",
    "Occurred At",
    "Action",
    "Subject Type",
    "Subject ID",
    "Actor ID",
    "Origin Address",
    "Origin Agent",
    "Summary",
    "Before",
    "After",
];

/// Export records to CSV
pub fn export_records_csv<W: Write>(records: &[AuditRecord], writer: W) -> AuditResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let csv_err = |e: csv::Error| AuditError::Export(e.to_string());

    csv_writer.write_record(HEADER).map_err(csv_err)?;

    for record in records {
        csv_writer
            .write_record([
                record.id.to_string(),
                record.occurred_at.to_rfc3339(),
                record.action.to_string(),
                record.subject_type.clone(),
                record.subject_id.clone().unwrap_or_default(),
                record.actor_id.clone().unwrap_or_default(),
                record.origin_address.clone().unwrap_or_default(),
                record.origin_agent.clone().unwrap_or_default(),
                record.summary.clone(),
                attributes_cell(&record.before)?,
                attributes_cell(&record.after)?,
            ])
            .map_err(csv_err)?;
    }

    csv_writer
        .flush()
        .map_err(|e| AuditError::Export(e.to_string()))?;

    Ok(())
}

fn attributes_cell(attributes: &Attributes) -> AuditResult<String> {
    if attributes.is_empty() {
        return Ok(String::new());
    }
    serde_json::to_string(attributes).map_err(|e| AuditError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{Actor, AuditAction, RequestContext};
    use serde_json::json;

    #[test]
    fn test_export_csv() {
        let ctx = RequestContext::request("10.0.0.5", "Mozilla/5.0, like Gecko").with_actor(Actor::user("7"));
        let mut after = Attributes::new();
        after.insert("name".into(), json!("Acme Agency"));
        let record = AuditRecord::new(
            &ctx,
            AuditAction::Created,
            "Agency",
            Some("1".into()),
            "Agency 'Acme Agency' was created",
        )
        .with_values(Attributes::new(), after);

        let mut buffer = Vec::new();
        export_records_csv(&[record], &mut buffer).unwrap();

        let mut reader = csv::Reader::from_reader(buffer.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 11);
        assert_eq!(&headers[2], "Action");

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][2], "created");
        assert_eq!(&rows[0][7], "Mozilla/5.0, like Gecko");
        assert_eq!(&rows[0][9], "");
        assert_eq!(&rows[0][10], r#"{"name":"Acme Agency"}"#);
    }

    #[test]
    fn test_export_csv_empty_has_header_only() {
        let mut buffer = Vec::new();
        export_records_csv(&[], &mut buffer).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(output.lines().count(), 1);
        assert!(output.starts_with("ID,Occurred At,Action"));
    }
}
