//! Audited subjects
//!
//! The `Auditable` trait is the capability an entity type implements to take
//! part in the audit trail. A `Snapshot` freezes an entity's attributes at
//! one lifecycle point so that later mutations cannot change what is
//! recorded.

use serde::Serialize;
use serde_json::Value;

use super::record::{AuditAction, Attributes};
use crate::error::{AuditError, AuditResult};

/// An entity type whose lifecycle is recorded in the audit trail
pub trait Auditable: Serialize {
    /// Logical type name, also used as the label in summaries
    const SUBJECT_TYPE: &'static str;

    /// Identifier of this instance
    fn subject_id(&self) -> String;

    /// Flat attribute projection of this instance
    ///
    /// The default serializes the entity with serde and requires a JSON
    /// object at the top level.
    fn attributes(&self) -> AuditResult<Attributes> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(AuditError::InvalidSnapshot {
                subject_type: Self::SUBJECT_TYPE,
                reason: format!("expected a JSON object, got {}", json_kind(&other)),
            }),
        }
    }

    /// Computed display name for entities without `name`, `title` or
    /// `first_name`/`last_name` attributes
    fn display_name(&self) -> Option<String> {
        None
    }
}

/// Attributes of a subject captured at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub subject_type: &'static str,
    pub subject_id: String,
    pub attributes: Attributes,
    pub display_name: Option<String>,
}

impl Snapshot {
    /// Capture the current state of an entity
    pub fn capture<T: Auditable>(entity: &T) -> AuditResult<Self> {
        Ok(Self {
            subject_type: T::SUBJECT_TYPE,
            subject_id: entity.subject_id(),
            attributes: entity.attributes()?,
            display_name: entity.display_name(),
        })
    }

    /// Human-readable identifier of the subject
    ///
    /// Falls back from `name` to `title` to `first_name last_name` to the
    /// computed display name and finally to `#<id>`.
    pub fn identifier(&self) -> String {
        if let Some(name) = self.text_attribute("name") {
            return name;
        }
        if let Some(title) = self.text_attribute("title") {
            return title;
        }
        if let (Some(first), Some(last)) = (
            self.text_attribute("first_name"),
            self.text_attribute("last_name"),
        ) {
            return format!("{} {}", first, last);
        }
        if let Some(display) = &self.display_name {
            return display.clone();
        }
        format!("#{}", self.subject_id)
    }

    /// Summary line for a lifecycle action on this subject
    pub fn summary(&self, action: AuditAction) -> String {
        format!("{} '{}' was {}", self.subject_type, self.identifier(), action)
    }

    fn text_attribute(&self, key: &str) -> Option<String> {
        match self.attributes.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
