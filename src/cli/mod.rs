//! CLI command handlers
//!
//! Bridges clap argument parsing with the audit store and formatters.

pub mod audit;
pub mod export;

pub use audit::{find_record, handle_audit_command, AuditCommands};
pub use export::handle_export_command;
