//! Therapy session model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{impl_entity, require};
use crate::error::{AuditError, AuditResult};

/// A scheduled therapy session for a resident
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TherapySession {
    pub id: u64,

    pub title: String,

    pub resident_id: u64,

    /// Therapist (user) running the session
    #[serde(default)]
    pub therapist_id: Option<u64>,

    pub scheduled_for: DateTime<Utc>,

    pub duration_minutes: u32,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl TherapySession {
    pub fn new(
        title: impl Into<String>,
        resident_id: u64,
        scheduled_for: DateTime<Utc>,
        duration_minutes: u32,
    ) -> Self {
        Self {
            id: 0,
            title: title.into(),
            resident_id,
            therapist_id: None,
            scheduled_for,
            duration_minutes,
            notes: None,
            deleted_at: None,
        }
    }

    fn check(&self) -> AuditResult<()> {
        require("Session title", &self.title, 160)?;
        if self.duration_minutes == 0 {
            return Err(AuditError::Validation(
                "Session duration must be positive".into(),
            ));
        }
        Ok(())
    }

    fn label(&self) -> Option<String> {
        None
    }
}

impl_entity!(TherapySession, "TherapySession", "therapy_sessions");
