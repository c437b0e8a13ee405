//! The change auditor
//!
//! Turns entity lifecycle notifications into audit records. The persistence
//! layer calls one of `created`, `updated`, `deleted` or `restored` in the
//! same call path as the mutation; a store failure is returned to it
//! unchanged.

use tracing::{debug, trace};

use super::context::RequestContext;
use super::diff::project_changes;
use super::record::{AuditAction, AuditRecord, Attributes};
use super::redact::redact;
use super::store::AuditStore;
use super::subject::{Auditable, Snapshot};
use crate::error::AuditResult;

/// Records entity lifecycle events into an audit store
pub struct ChangeAuditor<S> {
    store: S,
}

impl<S: AuditStore> ChangeAuditor<S> {
    /// Create an auditor writing to `store`
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record the creation of `entity`
    pub fn created<T: Auditable>(&self, ctx: &RequestContext, entity: &T) -> AuditResult<AuditRecord> {
        self.record_created(ctx, &Snapshot::capture(entity)?)
    }

    /// Record an update from `original` to `current`
    ///
    /// Returns `Ok(None)` without writing anything when no unredacted
    /// attribute changed.
    pub fn updated<T: Auditable>(
        &self,
        ctx: &RequestContext,
        original: &T,
        current: &T,
    ) -> AuditResult<Option<AuditRecord>> {
        self.record_updated(ctx, &Snapshot::capture(original)?, &Snapshot::capture(current)?)
    }

    /// Record the deletion of `entity`, captured just before deletion
    pub fn deleted<T: Auditable>(&self, ctx: &RequestContext, entity: &T) -> AuditResult<AuditRecord> {
        self.record_deleted(ctx, &Snapshot::capture(entity)?)
    }

    /// Record the restoration of `entity`, captured after restoring
    pub fn restored<T: Auditable>(&self, ctx: &RequestContext, entity: &T) -> AuditResult<AuditRecord> {
        self.record_restored(ctx, &Snapshot::capture(entity)?)
    }

    /// Snapshot form of [`ChangeAuditor::created`]
    pub fn record_created(&self, ctx: &RequestContext, snapshot: &Snapshot) -> AuditResult<AuditRecord> {
        let record = lifecycle_record(ctx, AuditAction::Created, snapshot)
            .with_values(Attributes::new(), redact(&snapshot.attributes));
        persist(&self.store, record)
    }

    /// Snapshot form of [`ChangeAuditor::updated`]
    pub fn record_updated(
        &self,
        ctx: &RequestContext,
        original: &Snapshot,
        current: &Snapshot,
    ) -> AuditResult<Option<AuditRecord>> {
        let before = redact(&original.attributes);
        let after = redact(&current.attributes);

        let Some((before, after)) = project_changes(&before, &after) else {
            trace!(
                subject_type = current.subject_type,
                subject_id = %current.subject_id,
                "No audited attribute changed, skipping update record"
            );
            return Ok(None);
        };

        let record = lifecycle_record(ctx, AuditAction::Updated, current).with_values(before, after);
        persist(&self.store, record).map(Some)
    }

    /// Snapshot form of [`ChangeAuditor::deleted`]
    pub fn record_deleted(&self, ctx: &RequestContext, snapshot: &Snapshot) -> AuditResult<AuditRecord> {
        let record = lifecycle_record(ctx, AuditAction::Deleted, snapshot)
            .with_values(redact(&snapshot.attributes), Attributes::new());
        persist(&self.store, record)
    }

    /// Snapshot form of [`ChangeAuditor::restored`]
    pub fn record_restored(&self, ctx: &RequestContext, snapshot: &Snapshot) -> AuditResult<AuditRecord> {
        let record = lifecycle_record(ctx, AuditAction::Restored, snapshot)
            .with_values(Attributes::new(), redact(&snapshot.attributes));
        persist(&self.store, record)
    }
}

fn lifecycle_record(ctx: &RequestContext, action: AuditAction, snapshot: &Snapshot) -> AuditRecord {
    AuditRecord::new(
        ctx,
        action,
        snapshot.subject_type,
        Some(snapshot.subject_id.clone()),
        snapshot.summary(action),
    )
}

/// Append `record` to `store` and hand it back
pub(crate) fn persist<S: AuditStore>(store: &S, record: AuditRecord) -> AuditResult<AuditRecord> {
    store.append(&record)?;

    debug!(
        record_id = %record.id,
        action = %record.action,
        subject_type = %record.subject_type,
        subject_id = record.subject_id.as_deref().unwrap_or("-"),
        actor_id = record.actor_id.as_deref().unwrap_or("-"),
        "Audit record written"
    );

    Ok(record)
}
