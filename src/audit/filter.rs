//! Record selection for inspection
//!
//! Selecting records is read-only: nothing here replays or reconstructs
//! entity state.

use chrono::{DateTime, Utc};

use super::record::{AuditAction, AuditRecord};

/// Criteria for selecting audit records; unset fields match everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditFilter {
    pub subject_type: Option<String>,
    pub subject_id: Option<String>,
    pub action: Option<AuditAction>,
    pub actor_id: Option<String>,
    /// Only records at or after this instant
    pub since: Option<DateTime<Utc>>,
    /// Keep at most this many of the most recent matches
    pub limit: Option<usize>,
}

impl AuditFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match the trail of a single subject
    pub fn subject(subject_type: impl Into<String>, subject_id: impl Into<String>) -> Self {
        Self {
            subject_type: Some(subject_type.into()),
            subject_id: Some(subject_id.into()),
            ..Self::default()
        }
    }

    pub fn with_action(mut self, action: AuditAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_actor(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = Some(actor_id.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether `record` satisfies every set criterion
    ///
    /// Subject types compare case-insensitively.
    pub fn matches(&self, record: &AuditRecord) -> bool {
        if let Some(subject_type) = &self.subject_type {
            if !record.subject_type.eq_ignore_ascii_case(subject_type) {
                return false;
            }
        }
        if let Some(subject_id) = &self.subject_id {
            if record.subject_id.as_deref() != Some(subject_id.as_str()) {
                return false;
            }
        }
        if let Some(action) = self.action {
            if record.action != action {
                return false;
            }
        }
        if let Some(actor_id) = &self.actor_id {
            if record.actor_id.as_deref() != Some(actor_id.as_str()) {
                return false;
            }
        }
        if let Some(since) = self.since {
            if record.occurred_at < since {
                return false;
            }
        }
        true
    }

    /// Select matching records, keeping their original order
    pub fn apply(&self, records: Vec<AuditRecord>) -> Vec<AuditRecord> {
        let mut selected: Vec<AuditRecord> = records.into_iter().filter(|r| self.matches(r)).collect();

        if let Some(limit) = self.limit {
            if selected.len() > limit {
                selected.drain(..selected.len() - limit);
            }
        }

        selected
    }
}
