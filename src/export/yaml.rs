//! YAML Export functionality
//!
//! Exports audit records to YAML for human review.

use std::io::Write;

use crate::audit::AuditRecord;
use crate::error::{AuditError, AuditResult};
use crate::export::json::AuditExport;

/// Export records to YAML with a header comment
pub fn export_records_yaml<W: Write>(records: Vec<AuditRecord>, writer: &mut W) -> AuditResult<()> {
    let export = AuditExport::new(records);
    let io_err = |e: std::io::Error| AuditError::Export(e.to_string());

    writeln!(writer, "# care-audit trail export").map_err(io_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(io_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(io_err)?;
    writeln!(writer, "#").map_err(io_err)?;
    writeln!(writer, "# Credential fields are never recorded in the trail.").map_err(io_err)?;
    writeln!(writer).map_err(io_err)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| AuditError::Export(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{Actor, AuditAction, RequestContext};

    #[test]
    fn test_export_yaml_has_header_and_records() {
        let ctx = RequestContext::request("10.0.0.5", "Mozilla/5.0").with_actor(Actor::user("7"));
        let records = vec![
            AuditRecord::new(&ctx, AuditAction::Login, "User", Some("7".into()), "User '7' logged in"),
            AuditRecord::new(&ctx, AuditAction::Logout, "User", Some("7".into()), "User '7' logged out"),
        ];

        let mut buffer = Vec::new();
        export_records_yaml(records, &mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert!(output.starts_with("# care-audit trail export"));
        assert!(output.contains("action: login"));

        let export: AuditExport = serde_yaml::from_str(&output).unwrap();
        assert_eq!(export.record_count, 2);
        assert_eq!(export.records[1].action, AuditAction::Logout);
    }
}
