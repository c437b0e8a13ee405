//! Agency model
//!
//! Staffing agencies supplying temporary carers to the home.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::entity::{impl_entity, require};
use crate::error::AuditResult;

/// A staffing agency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agency {
    /// Identifier assigned by the repository
    pub id: u64,

    /// Agency name
    pub name: String,

    /// Contact phone number
    pub phone: String,

    /// Contact email
    #[serde(default)]
    pub email: Option<String>,

    /// Whether the agency may currently be booked
    pub is_active: bool,

    /// Soft-delete timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Agency {
    /// Create a new, active agency
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            phone: phone.into(),
            email: None,
            is_active: true,
            deleted_at: None,
        }
    }

    fn check(&self) -> AuditResult<()> {
        require("Agency name", &self.name, 120)?;
        require("Agency phone", &self.phone, 32)
    }

    fn label(&self) -> Option<String> {
        None
    }
}

impl_entity!(Agency, "Agency", "agencies");

impl fmt::Display for Agency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
