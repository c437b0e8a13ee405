//! Persisted entity capability
//!
//! Every stored model has a numeric ID assigned by its repository and a
//! soft-delete timestamp. The `impl_entity!` macro generates the accessor
//! boilerplate together with the `Auditable` implementation.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use crate::audit::Auditable;
use crate::error::AuditResult;

/// A model stored by an `EntityRepository`
pub trait Entity: Auditable + Clone + DeserializeOwned + Send + Sync {
    /// File stem of the data file (e.g. "agencies" -> data/agencies.json)
    const FILE_NAME: &'static str;

    fn id(&self) -> u64;

    fn set_id(&mut self, id: u64);

    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    fn set_deleted_at(&mut self, at: Option<DateTime<Utc>>);

    /// Whether the entity is soft-deleted
    fn is_trashed(&self) -> bool {
        self.deleted_at().is_some()
    }

    /// Check invariants before the entity is stored
    fn validate(&self) -> AuditResult<()>;
}

/// Implement `Entity` and `Auditable` for a model
///
/// The model needs `id: u64` and `deleted_at: Option<DateTime<Utc>>` fields
/// plus inherent `check(&self) -> AuditResult<()>` and
/// `label(&self) -> Option<String>` methods.
macro_rules! impl_entity {
    ($model:ty, $subject_type:literal, $file_name:literal) => {
        impl $crate::models::Entity for $model {
            const FILE_NAME: &'static str = $file_name;

            fn id(&self) -> u64 {
                self.id
            }

            fn set_id(&mut self, id: u64) {
                self.id = id;
            }

            fn deleted_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
                self.deleted_at
            }

            fn set_deleted_at(&mut self, at: Option<chrono::DateTime<chrono::Utc>>) {
                self.deleted_at = at;
            }

            fn validate(&self) -> $crate::error::AuditResult<()> {
                self.check()
            }
        }

        impl $crate::audit::Auditable for $model {
            const SUBJECT_TYPE: &'static str = $subject_type;

            fn subject_id(&self) -> String {
                self.id.to_string()
            }

            fn display_name(&self) -> Option<String> {
                self.label()
            }
        }
    };
}

pub(crate) use impl_entity;

/// Shared check for required text fields
pub(crate) fn require(field: &str, value: &str, max_len: usize) -> AuditResult<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(crate::error::AuditError::Validation(format!(
            "{} cannot be empty",
            field
        )));
    }
    if trimmed.chars().count() > max_len {
        return Err(crate::error::AuditError::Validation(format!(
            "{} is too long ({} chars, max {})",
            field,
            trimmed.chars().count(),
            max_len
        )));
    }
    Ok(())
}
