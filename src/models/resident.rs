//! Resident model
//!
//! People living in the home.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{impl_entity, require};
use crate::error::{AuditError, AuditResult};

/// A resident of the care home
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resident {
    pub id: u64,

    pub first_name: String,

    pub last_name: String,

    pub date_of_birth: NaiveDate,

    /// Room number, absent while awaiting allocation
    #[serde(default)]
    pub room: Option<String>,

    /// NHS or other care-system number
    #[serde(default)]
    pub care_number: Option<String>,

    pub admitted_on: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Resident {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: NaiveDate,
        admitted_on: NaiveDate,
    ) -> Self {
        Self {
            id: 0,
            first_name: first_name.into(),
            last_name: last_name.into(),
            date_of_birth,
            room: None,
            care_number: None,
            admitted_on,
            deleted_at: None,
        }
    }

    /// "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    fn check(&self) -> AuditResult<()> {
        require("First name", &self.first_name, 80)?;
        require("Last name", &self.last_name, 80)?;
        if self.admitted_on < self.date_of_birth {
            return Err(AuditError::Validation(
                "Admission date cannot precede date of birth".into(),
            ));
        }
        Ok(())
    }

    fn label(&self) -> Option<String> {
        Some(self.full_name())
    }
}

impl_entity!(Resident, "Resident", "residents");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditAction, Snapshot};
    use crate::models::Entity;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_summary_uses_first_and_last_name() {
        let mut resident = Resident::new("Ann", "Lee", date(1940, 3, 2), date(2024, 1, 15));
        resident.id = 8;

        let snapshot = Snapshot::capture(&resident).unwrap();
        assert_eq!(
            snapshot.summary(AuditAction::Created),
            "Resident 'Ann Lee' was created"
        );
    }

    #[test]
    fn test_admission_before_birth_is_invalid() {
        let resident = Resident::new("Ann", "Lee", date(1940, 3, 2), date(1930, 1, 1));
        assert!(resident.validate().is_err());
    }
}
