//! User model
//!
//! Staff accounts that sign in to the application. Carries credential
//! fields that the audit trail never records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{impl_entity, require};
use crate::audit::Actor;
use crate::error::{AuditError, AuditResult};

/// Role granted to a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Manager,
    Nurse,
    #[default]
    Carer,
    Mentor,
}

/// An application user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,

    pub name: String,

    pub email: String,

    #[serde(default)]
    pub role: UserRole,

    /// Password hash
    pub password: String,

    /// Persistent-session token
    #[serde(default)]
    pub remember_token: Option<String>,

    #[serde(default)]
    pub two_factor_secret: Option<String>,

    #[serde(default)]
    pub two_factor_recovery_codes: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            email: email.into(),
            role: UserRole::default(),
            password: password_hash.into(),
            remember_token: None,
            two_factor_secret: None,
            two_factor_recovery_codes: None,
            deleted_at: None,
        }
    }

    /// This user as the actor of a request
    pub fn as_actor(&self) -> Actor {
        Actor::user(self.id.to_string())
    }

    fn check(&self) -> AuditResult<()> {
        require("Name", &self.name, 120)?;
        require("Email", &self.email, 254)?;
        if !self.email.contains('@') {
            return Err(AuditError::Validation(format!(
                "Invalid email address: {}",
                self.email
            )));
        }
        Ok(())
    }

    fn label(&self) -> Option<String> {
        None
    }
}

impl_entity!(User, "User", "users");
