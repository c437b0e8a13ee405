//! Audit record data structures
//!
//! Defines the action vocabulary, the attribute map type and the immutable
//! record that is appended to the audit store once per observed event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::context::RequestContext;

/// Flat field name -> value map captured from an entity
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Types of events that produce an audit record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Entity was created
    Created,
    /// Entity was updated
    Updated,
    /// Entity was (soft) deleted
    Deleted,
    /// Soft-deleted entity was restored
    Restored,
    /// Actor authenticated successfully
    Login,
    /// Actor ended their session
    Logout,
    /// Authentication attempt was rejected
    LoginFailed,
}

impl AuditAction {
    /// All actions, in declaration order
    pub const ALL: [AuditAction; 7] = [
        AuditAction::Created,
        AuditAction::Updated,
        AuditAction::Deleted,
        AuditAction::Restored,
        AuditAction::Login,
        AuditAction::Logout,
        AuditAction::LoginFailed,
    ];

    /// The stored (snake_case) name of the action
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Created => "created",
            AuditAction::Updated => "updated",
            AuditAction::Deleted => "deleted",
            AuditAction::Restored => "restored",
            AuditAction::Login => "login",
            AuditAction::Logout => "logout",
            AuditAction::LoginFailed => "login_failed",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        AuditAction::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == normalized)
            .ok_or_else(|| format!("unknown audit action: {}", s))
    }
}

/// A single audit record
///
/// Records exactly one lifecycle or authentication event. Records are
/// append-only: nothing in this crate mutates a record after it was built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unique record ID
    pub id: Uuid,

    /// Authenticated user responsible for the event, absent for system or
    /// unauthenticated events
    pub actor_id: Option<String>,

    /// What happened
    pub action: AuditAction,

    /// Logical entity type (e.g. "Resident")
    pub subject_type: String,

    /// ID of the subject, absent when no subject exists (failed login)
    pub subject_id: Option<String>,

    /// Previous values of the captured fields
    #[serde(default)]
    pub before: Attributes,

    /// New values of the captured fields
    #[serde(default)]
    pub after: Attributes,

    /// Network address of the triggering request
    pub origin_address: Option<String>,

    /// Client identification string of the triggering request
    pub origin_agent: Option<String>,

    /// Human-readable description
    pub summary: String,

    /// When the record was created (UTC)
    pub occurred_at: DateTime<Utc>,
}

impl AuditRecord {
    /// Start a record for `action` on a subject, stamping actor, origin,
    /// a fresh ID and the current time from `ctx`
    pub fn new(
        ctx: &RequestContext,
        action: AuditAction,
        subject_type: impl Into<String>,
        subject_id: Option<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            actor_id: ctx.actor_id(),
            action,
            subject_type: subject_type.into(),
            subject_id,
            before: Attributes::new(),
            after: Attributes::new(),
            origin_address: ctx.origin_address.clone(),
            origin_agent: ctx.origin_agent.clone(),
            summary: summary.into(),
            occurred_at: Utc::now(),
        }
    }

    /// Set the captured values (already redacted by the caller)
    pub fn with_values(mut self, before: Attributes, after: Attributes) -> Self {
        self.before = before;
        self.after = after;
        self
    }

    /// Whether this record belongs to the trail of the given subject
    pub fn is_about(&self, subject_type: &str, subject_id: &str) -> bool {
        self.subject_type == subject_type && self.subject_id.as_deref() == Some(subject_id)
    }

    /// Sorted list of field names captured on either side
    pub fn changed_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = self
            .before
            .keys()
            .chain(self.after.keys())
            .map(|k| k.as_str())
            .collect();
        fields.sort_unstable();
        fields.dedup();
        fields
    }
}
