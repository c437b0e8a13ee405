//! Request context passed explicitly into the auditor
//!
//! The caller (request middleware, job runner, test) builds one context per
//! operation. Nothing in this crate looks the actor or origin up globally.

use serde::{Deserialize, Serialize};

/// The authenticated identity performing an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Identifier of the actor
    pub id: String,
    /// Entity type of the actor (usually "User")
    pub subject_type: String,
}

impl Actor {
    /// Create an actor of type `User`
    pub fn user(id: impl Into<String>) -> Self {
        Self::new("User", id)
    }

    /// Create an actor of an arbitrary type
    pub fn new(subject_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            subject_type: subject_type.into(),
        }
    }
}

/// Per-operation context: who is acting and from where
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub actor: Option<Actor>,
    pub origin_address: Option<String>,
    pub origin_agent: Option<String>,
}

impl RequestContext {
    /// Context for work that is not triggered by a request
    /// (scheduled jobs, migrations). No actor and no origin.
    pub fn system() -> Self {
        Self::default()
    }

    /// Context for an HTTP request with the given origin
    pub fn request(origin_address: impl Into<String>, origin_agent: impl Into<String>) -> Self {
        Self {
            actor: None,
            origin_address: Some(origin_address.into()),
            origin_agent: Some(origin_agent.into()),
        }
    }

    /// Attach an authenticated actor
    pub fn with_actor(mut self, actor: Actor) -> Self {
        self.actor = Some(actor);
        self
    }

    /// ID of the acting user, if any
    pub fn actor_id(&self) -> Option<String> {
        self.actor.as_ref().map(|a| a.id.clone())
    }
}
