//! Discharge model
//!
//! Discharges carry no name or title; the audit trail identifies them by ID.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{impl_entity, require};
use crate::error::AuditResult;

/// A resident leaving the home
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discharge {
    pub id: u64,

    pub resident_id: u64,

    pub discharged_on: NaiveDate,

    /// Where the resident went (hospital, family, other home)
    pub destination: String,

    #[serde(default)]
    pub reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Discharge {
    pub fn new(resident_id: u64, discharged_on: NaiveDate, destination: impl Into<String>) -> Self {
        Self {
            id: 0,
            resident_id,
            discharged_on,
            destination: destination.into(),
            reason: None,
            deleted_at: None,
        }
    }

    fn check(&self) -> AuditResult<()> {
        require("Destination", &self.destination, 200)
    }

    fn label(&self) -> Option<String> {
        None
    }
}

impl_entity!(Discharge, "Discharge", "discharges");
