//! JSON Export functionality
//!
//! Exports audit records with a small versioned envelope.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audit::AuditRecord;
use crate::error::{AuditError, AuditResult};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Audit trail export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// Number of exported records
    pub record_count: usize,

    /// Records in insertion order
    pub records: Vec<AuditRecord>,
}

impl AuditExport {
    pub fn new(records: Vec<AuditRecord>) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            record_count: records.len(),
            records,
        }
    }
}

/// Export records as pretty-printed JSON
pub fn export_records_json<W: Write>(records: Vec<AuditRecord>, writer: &mut W) -> AuditResult<()> {
    let export = AuditExport::new(records);
    serde_json::to_writer_pretty(&mut *writer, &export).map_err(|e| AuditError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| AuditError::Export(e.to_string()))?;
    Ok(())
}
