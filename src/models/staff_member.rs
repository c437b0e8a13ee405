//! Staff member model
//!
//! Rota entries for staff. Names are stored as given names and family name,
//! so the audit summary relies on the computed display name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{impl_entity, require};
use crate::error::AuditResult;

/// A member of staff on the rota
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: u64,

    pub given_names: String,

    pub family_name: String,

    /// Job title shown on the rota
    pub position: String,

    /// Contracted hours per week
    pub contracted_hours: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl StaffMember {
    pub fn new(
        given_names: impl Into<String>,
        family_name: impl Into<String>,
        position: impl Into<String>,
        contracted_hours: u32,
    ) -> Self {
        Self {
            id: 0,
            given_names: given_names.into(),
            family_name: family_name.into(),
            position: position.into(),
            contracted_hours,
            deleted_at: None,
        }
    }

    fn check(&self) -> AuditResult<()> {
        require("Given names", &self.given_names, 120)?;
        require("Family name", &self.family_name, 80)?;
        require("Position", &self.position, 80)
    }

    fn label(&self) -> Option<String> {
        Some(format!("{} {}", self.given_names, self.family_name))
    }
}

impl_entity!(StaffMember, "StaffMember", "staff");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditAction, Snapshot};

    #[test]
    fn test_summary_uses_display_name() {
        let mut staff = StaffMember::new("Mary Jane", "Okafor", "Senior Carer", 37);
        staff.id = 2;

        let snapshot = Snapshot::capture(&staff).unwrap();
        assert_eq!(
            snapshot.summary(AuditAction::Updated),
            "StaffMember 'Mary Jane Okafor' was updated"
        );
    }
}
