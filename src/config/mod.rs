//! Configuration for care-audit
//!
//! Path resolution and persisted user settings.

pub mod paths;
pub mod settings;

pub use paths::AuditPaths;
pub use settings::Settings;
