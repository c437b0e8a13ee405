//! Path management for care-audit
//!
//! ## Path Resolution Order
//!
//! 1. `CARE_AUDIT_DATA_DIR` environment variable (if set)
//! 2. The platform config directory (`~/.config/care-audit` on Linux,
//!    `%APPDATA%\care-audit\config` on Windows)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::{AuditError, AuditResult};

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "CARE_AUDIT_DATA_DIR";

/// Manages all paths used by care-audit
#[derive(Debug, Clone)]
pub struct AuditPaths {
    base_dir: PathBuf,
}

impl AuditPaths {
    /// Resolve the base directory from the environment or the platform
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> AuditResult<Self> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create AuditPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory holding the entity files (<base>/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Path to the JSON Lines audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Path to the data file of one entity type (data/<name>.json)
    pub fn entity_file(&self, name: &str) -> PathBuf {
        self.data_dir().join(format!("{}.json", name))
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> AuditResult<()> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| AuditError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| AuditError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }
}

fn resolve_default_path() -> AuditResult<PathBuf> {
    ProjectDirs::from("", "", "care-audit")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| AuditError::Config("Could not determine home directory".into()))
}
