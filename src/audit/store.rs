//! Append-only audit stores
//!
//! `JsonlStore` writes one JSON object per line to the audit log file and
//! flushes on every write. `MemoryStore` keeps records in a vector and is
//! used by tests and embedders that persist records themselves.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{AuditError, AuditResult};

use super::record::AuditRecord;

/// Append-only sink for audit records
pub trait AuditStore: Send + Sync {
    /// Persist one record
    fn append(&self, record: &AuditRecord) -> AuditResult<()>;

    /// All stored records in insertion order
    fn records(&self) -> AuditResult<Vec<AuditRecord>>;

    /// Records belonging to one subject, in insertion order
    fn trail(&self, subject_type: &str, subject_id: &str) -> AuditResult<Vec<AuditRecord>> {
        Ok(self
            .records()?
            .into_iter()
            .filter(|r| r.is_about(subject_type, subject_id))
            .collect())
    }
}

impl<S: AuditStore + ?Sized> AuditStore for std::sync::Arc<S> {
    fn append(&self, record: &AuditRecord) -> AuditResult<()> {
        (**self).append(record)
    }

    fn records(&self) -> AuditResult<Vec<AuditRecord>> {
        (**self).records()
    }
}

/// Writes audit records to a JSON Lines file
pub struct JsonlStore {
    /// Path to the audit log file
    log_path: PathBuf,
}

impl JsonlStore {
    /// Create a store that writes to the specified path
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    fn open_for_append(&self) -> AuditResult<File> {
        if let Some(parent) = self.log_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AuditError::Storage(format!("Failed to create audit log directory: {}", e))
            })?;
        }

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| AuditError::Storage(format!("Failed to open audit log: {}", e)))
    }

    /// Number of non-empty lines in the log
    pub fn entry_count(&self) -> AuditResult<usize> {
        if !self.log_path.exists() {
            return Ok(0);
        }

        let file = File::open(&self.log_path)
            .map_err(|e| AuditError::Storage(format!("Failed to open audit log: {}", e)))?;

        let count = BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter(|l| !l.trim().is_empty())
            .count();

        Ok(count)
    }

    /// Get the path to the audit log file
    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }
}

impl AuditStore for JsonlStore {
    fn append(&self, record: &AuditRecord) -> AuditResult<()> {
        // One write_all per record keeps concurrent appends line-atomic
        let mut line = serde_json::to_string(record)
            .map_err(|e| AuditError::Json(format!("Failed to serialize audit record: {}", e)))?;
        line.push('\n');

        let mut file = self.open_for_append()?;
        file.write_all(line.as_bytes())
            .map_err(|e| AuditError::Storage(format!("Failed to write audit record: {}", e)))?;
        file.flush()
            .map_err(|e| AuditError::Storage(format!("Failed to flush audit log: {}", e)))?;

        Ok(())
    }

    fn records(&self) -> AuditResult<Vec<AuditRecord>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| AuditError::Storage(format!("Failed to open audit log: {}", e)))?;

        let mut records = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                AuditError::Storage(format!(
                    "Failed to read audit log line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let record: AuditRecord = serde_json::from_str(&line).map_err(|e| {
                AuditError::Json(format!(
                    "Failed to parse audit record at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;
            records.push(record);
        }

        Ok(records)
    }
}

/// Keeps audit records in memory
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<AuditRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditStore for MemoryStore {
    fn append(&self, record: &AuditRecord) -> AuditResult<()> {
        let mut records = self.records.write().map_err(|e| {
            AuditError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        records.push(record.clone());
        Ok(())
    }

    fn records(&self) -> AuditResult<Vec<AuditRecord>> {
        let records = self.records.read().map_err(|e| {
            AuditError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(records.clone())
    }
}
