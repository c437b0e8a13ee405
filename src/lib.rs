//! care-audit - attribute-level audit trail for care-home records
//!
//! Records every create, update, delete and restore of an audited entity,
//! and every login, logout and failed login, as immutable records. Credential
//! fields never reach the trail; updates store only the fields that changed.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `audit`: Change and authentication auditors, redaction, diffing, stores
//! - `models`: Audited care-home entities (agencies, residents, users, ...)
//! - `storage`: JSON file repositories that audit every mutation
//! - `config`: Configuration and path management
//! - `logging`: `tracing` subscriber setup for the binary
//! - `error`: Custom error types
//! - `display`, `export`, `cli`: the `care-audit` inspection binary
//!
//! # Example
//!
//! ```rust,ignore
//! use care_audit::audit::{Actor, RequestContext};
//! use care_audit::config::AuditPaths;
//! use care_audit::models::Agency;
//! use care_audit::storage::Storage;
//!
//! let storage = Storage::new(AuditPaths::new()?)?;
//! storage.load_all()?;
//!
//! let ctx = RequestContext::request(ip, user_agent).with_actor(Actor::user("7"));
//! let agency = storage.agencies.create(&ctx, Agency::new("Acme Agency", "555-0100"))?;
//! storage.agencies.update(&ctx, agency.id, |a| a.phone = "555-0199".into())?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod storage;

pub use error::{AuditError, AuditResult};
