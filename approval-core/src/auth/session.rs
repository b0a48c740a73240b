//! Session and Actor
//!
//! A [`Session`] only proves who logged in. Role facts live on [`Actor`],
//! which the engine re-resolves from the staff table and config on every
//! call, so a status flip or config change applies to open sessions at once.

use chrono::NaiveDateTime;
use serde::Serialize;
use shared::models::EmploymentStatus;

/// Authenticated caller context, passed into every engine call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    name: String,
    authenticated_at: NaiveDateTime,
}

impl Session {
    /// Only the identity store mints sessions
    pub(crate) fn new(name: impl Into<String>, authenticated_at: NaiveDateTime) -> Self {
        Self {
            name: name.into(),
            authenticated_at,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn authenticated_at(&self) -> NaiveDateTime {
        self.authenticated_at
    }
}

/// Role facts for one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub name: String,
    pub status: EmploymentStatus,
    pub is_admin: bool,
    pub is_finance_lead: bool,
}

impl Actor {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}
