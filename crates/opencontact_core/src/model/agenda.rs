//! Agenda domain model.
//!
//! # Invariants
//! - `id` is generated once and never reused.
//! - `name` is non-blank and at most 255 chars; uniqueness (ignoring case)
//!   is a storage-wide rule enforced by the agenda service and the schema.

use super::validation::{validate_name, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of an agenda.
pub type AgendaId = Uuid;

/// Persisted agenda record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agenda {
    pub id: AgendaId,
    pub name: String,
    /// Epoch milliseconds, set once on insert.
    pub created_at: i64,
    /// Epoch milliseconds, bumped on every update.
    pub updated_at: i64,
}

impl Agenda {
    /// Validates a candidate agenda name.
    pub fn validate_name(name: &str) -> Result<(), ValidationError> {
        validate_name("name", name)
    }

    /// Replaces the name in place. Persistence bumps `updated_at`.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}
