//! User settings for care-audit
//!
//! Persisted as `config.json` in the base directory. Missing fields fall
//! back to their defaults so older files keep loading.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use super::paths::AuditPaths;
use crate::error::{AuditError, AuditResult};
use crate::logging::{LogFormat, LogLevel, LogSettings};

/// User settings for care-audit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Minimum level of diagnostic log output
    #[serde(default)]
    pub log_level: LogLevel,

    /// Diagnostic log format (text or json)
    #[serde(default)]
    pub log_format: LogFormat,

    /// Number of records shown by `audit list` when no limit is given
    #[serde(default = "default_list_limit")]
    pub default_list_limit: usize,

    /// Timestamp format for tables (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_list_limit() -> usize {
    50
}

fn default_date_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            log_level: LogLevel::default(),
            log_format: LogFormat::default(),
            default_list_limit: default_list_limit(),
            date_format: default_date_format(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &AuditPaths) -> AuditResult<Self> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Not saved here, the caller decides when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| AuditError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| AuditError::Config(format!("Failed to parse settings file: {}", e)))?;
        settings.validate()?;

        Ok(settings)
    }

    /// Reject values that would fail later when rendering output
    pub fn validate(&self) -> AuditResult<()> {
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(AuditError::Config(format!(
                "Invalid date format: {}",
                self.date_format
            )));
        }
        Ok(())
    }

    /// Save settings to disk
    pub fn save(&self, paths: &AuditPaths) -> AuditResult<()> {
        self.validate()?;
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| AuditError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| AuditError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Subscriber configuration derived from these settings
    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            level: self.log_level,
            format: self.log_format,
        }
    }
}
