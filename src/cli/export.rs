//! CLI command for exporting the audit trail

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::audit::{AuditStore, JsonlStore};
use crate::error::{AuditError, AuditResult};
use crate::export::{export_records, ExportFormat};

/// Export all records to `output`, or stdout when absent
pub fn handle_export_command(log: &JsonlStore, format: ExportFormat, output: Option<PathBuf>) -> AuditResult<()> {
    let records = log.records()?;
    let count = records.len();

    match output {
        Some(path) => {
            let file = File::create(&path)
                .map_err(|e| AuditError::Export(format!("Failed to create {}: {}", path.display(), e)))?;
            let mut writer = BufWriter::new(file);
            export_records(format, records, &mut writer)?;
            writer
                .flush()
                .map_err(|e| AuditError::Export(e.to_string()))?;

            println!("Exported {} records to {}", count, path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            export_records(format, records, &mut writer)?;
            writer
                .flush()
                .map_err(|e| AuditError::Export(e.to_string()))?;
        }
    }

    Ok(())
}
