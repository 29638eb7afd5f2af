//! Contact domain model.
//!
//! # Invariants
//! - `id` is generated once and never reused.
//! - `agenda_id` always points to an existing agenda (foreign key).
//! - `(agenda_id, area_code, phone_number)` is unique across contacts.

use super::agenda::AgendaId;
use super::validation::{
    validate_area_code, validate_name, validate_phone_number, ValidationError,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a contact.
pub type ContactId = Uuid;

/// Kind of line a contact's number belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactType {
    Mobile,
    FixedLine,
    Fax,
}

/// Mutable part of a contact, replaced as a whole on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub name: String,
    /// Serialized as `type` to match external schema naming.
    #[serde(rename = "type")]
    pub kind: ContactType,
    /// Two digits.
    pub area_code: String,
    /// Eight or nine digits, without area code.
    pub phone_number: String,
}

impl ContactInfo {
    pub fn new(
        name: impl Into<String>,
        kind: ContactType,
        area_code: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            area_code: area_code.into(),
            phone_number: phone_number.into(),
        }
    }

    /// Checks name, area code and phone number shape.
    ///
    /// Returns the first failing field in declaration order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name("name", &self.name)?;
        validate_area_code(&self.area_code)?;
        validate_phone_number(&self.phone_number)?;
        Ok(())
    }
}

/// Persisted contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    pub agenda_id: AgendaId,
    #[serde(flatten)]
    pub info: ContactInfo,
    /// Epoch milliseconds, set once on insert.
    pub created_at: i64,
    /// Epoch milliseconds, bumped on every update.
    pub updated_at: i64,
}

impl Contact {
    /// Replaces name, type, area code and phone number together.
    pub fn update_info(&mut self, info: ContactInfo) {
        self.info = info;
    }
}
