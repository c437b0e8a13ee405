//! On-disk entity files
//!
//! Each audited entity type lives in one JSON document holding the next ID
//! and every entity, soft-deleted ones included. Writes go to a sibling
//! temp file that replaces the original by rename.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{AuditError, AuditResult};

/// Contents of an entity file
#[derive(Debug, Deserialize)]
pub(crate) struct EntityData<T> {
    #[serde(default)]
    pub next_id: u64,
    #[serde(default = "Vec::new")]
    pub entities: Vec<T>,
}

impl<T> Default for EntityData<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            entities: Vec::new(),
        }
    }
}

#[derive(Serialize)]
struct EntityDataRef<'a, T> {
    next_id: u64,
    entities: Vec<&'a T>,
}

/// The JSON file backing one entity type
pub(crate) struct EntityFile {
    path: PathBuf,
    subject_type: &'static str,
}

impl EntityFile {
    pub fn new(path: PathBuf, subject_type: &'static str) -> Self {
        Self { path, subject_type }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file; a file that was never written reads as empty
    pub fn read<T: DeserializeOwned>(&self) -> AuditResult<EntityData<T>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(EntityData::default()),
            Err(e) => return Err(self.error("read", e)),
        };

        serde_json::from_slice(&bytes).map_err(|e| self.error("parse", e))
    }

    /// Replace the file with `entities`, leaving the old contents on failure
    pub fn write<'a, T, I>(&self, next_id: u64, entities: I) -> AuditResult<()>
    where
        T: Serialize + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let data = EntityDataRef {
            next_id,
            entities: entities.into_iter().collect(),
        };
        let bytes = serde_json::to_vec_pretty(&data).map_err(|e| self.error("serialize", e))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.error("create directory for", e))?;
        }

        // Same directory as the target, so the rename stays on one filesystem
        let temp_path = self.path.with_extension("json.tmp");
        let written = write_synced(&temp_path, &bytes).and_then(|()| fs::rename(&temp_path, &self.path));
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(self.error("write", e));
        }

        Ok(())
    }

    fn error(&self, action: &str, err: impl fmt::Display) -> AuditError {
        AuditError::Storage(format!(
            "Failed to {} {} data at {}: {}",
            action,
            self.subject_type,
            self.path.display(),
            err
        ))
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn agency_file(temp_dir: &TempDir) -> EntityFile {
        EntityFile::new(temp_dir.path().join("agencies.json"), "Agency")
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let temp_dir = TempDir::new().unwrap();

        let data: EntityData<Value> = agency_file(&temp_dir).read().unwrap();

        assert_eq!(data.next_id, 1);
        assert!(data.entities.is_empty());
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let file = agency_file(&temp_dir);
        let entities = vec![json!({"id": 1, "name": "Acme Agency"}), json!({"id": 4, "name": "Bright Care"})];

        file.write(5, &entities).unwrap();
        let data: EntityData<Value> = file.read().unwrap();

        assert_eq!(data.next_id, 5);
        assert_eq!(data.entities, entities);
        assert!(!temp_dir.path().join("agencies.json.tmp").exists());
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let file = EntityFile::new(temp_dir.path().join("data").join("residents.json"), "Resident");

        file.write::<Value, _>(1, &[]).unwrap();

        assert!(file.path().exists());
    }

    #[test]
    fn test_parse_error_names_subject_type() {
        let temp_dir = TempDir::new().unwrap();
        let file = agency_file(&temp_dir);
        fs::write(file.path(), "not json at all").unwrap();

        let err = file.read::<Value>().unwrap_err();

        assert!(err.is_storage());
        assert!(err.to_string().contains("Failed to parse Agency data"));
    }

    #[test]
    fn test_failed_write_keeps_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = agency_file(&temp_dir);
        fs::create_dir(file.path()).unwrap();

        let err = file.write(2, &[json!({"id": 1})]).unwrap_err();

        assert!(err.to_string().contains("Failed to write Agency data"));
        assert!(file.path().is_dir());
        assert!(!temp_dir.path().join("agencies.json.tmp").exists());
    }
}
