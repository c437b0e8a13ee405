//! Audit trail for care-home records
//!
//! Records every create, update, delete and restore of an audited entity,
//! plus login, logout and failed login events, as immutable records in an
//! append-only store.
//!
//! # Architecture
//!
//! - `ChangeAuditor`: lifecycle entry points called by the persistence layer.
//!   Redacts credentials, diffs updates and skips updates that change
//!   nothing observable.
//! - `AuthAuditor`: authentication entry points, sharing redaction and
//!   storage but not diffing.
//! - `AuditStore`: append-only sink. `JsonlStore` writes JSON Lines,
//!   `MemoryStore` keeps records in memory.
//! - `Auditable` / `Snapshot`: the capability an entity implements and the
//!   frozen attribute map taken at a lifecycle point.
//! - `RequestContext`: actor and origin, passed explicitly by the caller.
//! - `AuditFilter`: read-only selection of records for inspection.
//!
//! # Example
//!
//! ```rust,ignore
//! use care_audit::audit::{ChangeAuditor, JsonlStore, RequestContext, Actor};
//!
//! let auditor = ChangeAuditor::new(JsonlStore::new(paths.audit_log()));
//! let ctx = RequestContext::request(ip, user_agent).with_actor(Actor::user("7"));
//!
//! auditor.created(&ctx, &agency)?;
//! auditor.updated(&ctx, &before, &agency)?; // Ok(None) when nothing changed
//! ```

mod auditor;
mod auth;
mod context;
mod diff;
mod filter;
mod record;
mod redact;
mod store;
mod subject;

pub use auditor::ChangeAuditor;
pub use auth::{AuthAuditor, LOGIN_SUBJECT_TYPE, UNKNOWN_IDENTIFIER};
pub use context::{Actor, RequestContext};
pub use diff::{changed_keys, format_value, generate_diff, project_changes};
pub use filter::AuditFilter;
pub use record::{Attributes, AuditAction, AuditRecord};
pub use redact::{is_redacted, redact, REDACTED_FIELDS};
pub use store::{AuditStore, JsonlStore, MemoryStore};
pub use subject::{Auditable, Snapshot};
