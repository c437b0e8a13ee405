//! Export module for care-audit
//!
//! - CSV: one row per record (spreadsheet-compatible)
//! - JSON: versioned, machine-readable export
//! - YAML: versioned, human-readable export

pub mod csv;
pub mod json;
pub mod yaml;

use std::io::Write;

use clap::ValueEnum;

use crate::audit::AuditRecord;
use crate::error::AuditResult;

pub use self::csv::export_records_csv;
pub use self::json::{export_records_json, AuditExport, EXPORT_SCHEMA_VERSION};
pub use self::yaml::export_records_yaml;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Yaml,
}

impl ExportFormat {
    /// Conventional file extension
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Yaml => "yaml",
        }
    }
}

/// Export `records` in `format` to `writer`
pub fn export_records<W: Write>(format: ExportFormat, records: Vec<AuditRecord>, writer: &mut W) -> AuditResult<()> {
    match format {
        ExportFormat::Csv => export_records_csv(&records, writer),
        ExportFormat::Json => export_records_json(records, writer),
        ExportFormat::Yaml => export_records_yaml(records, writer),
    }
}
