//! Authentication events
//!
//! A separate entry point from the change auditor, wired to the three
//! authentication outcomes. Shares record construction, redaction and
//! storage with lifecycle auditing; there is nothing to diff.

use serde_json::Value;
use tracing::trace;

use super::auditor::persist;
use super::context::{Actor, RequestContext};
use super::record::{AuditAction, AuditRecord, Attributes};
use super::redact::redact_in_place;
use super::store::AuditStore;
use crate::error::AuditResult;

/// Placeholder identifier for failed logins without one
pub const UNKNOWN_IDENTIFIER: &str = "unknown";

/// Subject type recorded for failed logins
pub const LOGIN_SUBJECT_TYPE: &str = "User";

/// Records authentication outcomes into an audit store
pub struct AuthAuditor<S> {
    store: S,
}

impl<S: AuditStore> AuthAuditor<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record a successful login of `actor`
    pub fn login(&self, ctx: &RequestContext, actor: &Actor) -> AuditResult<AuditRecord> {
        let mut record = AuditRecord::new(
            ctx,
            AuditAction::Login,
            actor.subject_type.clone(),
            Some(actor.id.clone()),
            format!("{} '{}' logged in", actor.subject_type, actor.id),
        );
        record.actor_id = Some(actor.id.clone());
        persist(&self.store, record)
    }

    /// Record a logout
    ///
    /// Nothing is written when the actor is no longer known (the session
    /// was already invalidated).
    pub fn logout(&self, ctx: &RequestContext, actor: Option<&Actor>) -> AuditResult<Option<AuditRecord>> {
        let Some(actor) = actor else {
            trace!("Logout without actor, skipping audit record");
            return Ok(None);
        };

        let mut record = AuditRecord::new(
            ctx,
            AuditAction::Logout,
            actor.subject_type.clone(),
            Some(actor.id.clone()),
            format!("{} '{}' logged out", actor.subject_type, actor.id),
        );
        record.actor_id = Some(actor.id.clone());
        persist(&self.store, record).map(Some)
    }

    /// Record a rejected login attempt for `identifier` (usually an email)
    pub fn login_failed(&self, ctx: &RequestContext, identifier: Option<&str>) -> AuditResult<AuditRecord> {
        let identifier = identifier
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_IDENTIFIER);

        let mut after = Attributes::new();
        after.insert("email".into(), Value::String(identifier.to_string()));
        redact_in_place(&mut after);

        let mut record = AuditRecord::new(
            ctx,
            AuditAction::LoginFailed,
            LOGIN_SUBJECT_TYPE,
            None,
            format!("Failed login attempt for '{}'", identifier),
        )
        .with_values(Attributes::new(), after);
        // Whoever is on the request, the attempt was not authenticated
        record.actor_id = None;
        persist(&self.store, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::store::MemoryStore;
    use serde_json::json;

    fn ctx() -> RequestContext {
        RequestContext::request("203.0.113.9", "Mozilla/5.0")
    }

    #[test]
    fn test_login() {
        let auditor = AuthAuditor::new(MemoryStore::new());
        let actor = Actor::user("12");

        let record = auditor.login(&ctx(), &actor).unwrap();

        assert_eq!(record.action, AuditAction::Login);
        assert_eq!(record.actor_id.as_deref(), Some("12"));
        assert_eq!(record.subject_type, "User");
        assert_eq!(record.subject_id.as_deref(), Some("12"));
        assert!(record.before.is_empty());
        assert!(record.after.is_empty());
        assert_eq!(record.origin_address.as_deref(), Some("203.0.113.9"));
    }

    #[test]
    fn test_logout_with_actor() {
        let auditor = AuthAuditor::new(MemoryStore::new());
        let actor = Actor::user("12");

        let record = auditor.logout(&ctx(), Some(&actor)).unwrap().unwrap();

        assert_eq!(record.action, AuditAction::Logout);
        assert_eq!(record.subject_id.as_deref(), Some("12"));
        assert_eq!(auditor.store().len(), 1);
    }

    #[test]
    fn test_logout_without_actor_is_skipped() {
        let auditor = AuthAuditor::new(MemoryStore::new());

        assert!(auditor.logout(&ctx(), None).unwrap().is_none());
        assert!(auditor.store().is_empty());
    }

    #[test]
    fn test_login_failed() {
        let auditor = AuthAuditor::new(MemoryStore::new());

        let record = auditor.login_failed(&ctx(), Some("x@example.com")).unwrap();

        assert_eq!(record.action, AuditAction::LoginFailed);
        assert!(record.actor_id.is_none());
        assert!(record.subject_id.is_none());
        assert_eq!(record.subject_type, "User");
        assert!(record.before.is_empty());
        assert_eq!(Value::Object(record.after), json!({"email": "x@example.com"}));
    }

    #[test]
    fn test_login_failed_defaults_identifier() {
        let auditor = AuthAuditor::new(MemoryStore::new());

        let missing = auditor.login_failed(&ctx(), None).unwrap();
        let blank = auditor.login_failed(&ctx(), Some("  ")).unwrap();

        assert_eq!(missing.after["email"], json!("unknown"));
        assert_eq!(blank.after["email"], json!("unknown"));
    }

    #[test]
    fn test_login_failed_ignores_request_actor() {
        let auditor = AuthAuditor::new(MemoryStore::new());
        let stale = ctx().with_actor(Actor::user("99"));

        let record = auditor.login_failed(&stale, Some("x@example.com")).unwrap();
        assert!(record.actor_id.is_none());
    }
}
