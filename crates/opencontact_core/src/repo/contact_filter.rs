//! Contact list filter, rendered to a parameterized WHERE clause.
//!
//! # Invariants
//! - The owning-agenda condition is always present and always first.
//! - Optional conditions are added only for non-blank needles.
//! - Conditions combine with AND only; there is no OR or negation.
//! - Matching happens in SQLite; needles are bound, never spliced into SQL.

use crate::model::agenda::AgendaId;
use crate::model::validation::name_key;
use rusqlite::types::Value;

/// One predicate over the `contacts` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactCondition {
    /// `agenda_id` equals the given agenda.
    AgendaIs(AgendaId),
    /// `name_key` contains the needle. Holds the already folded needle.
    NameContainsIgnoreCase(String),
    /// `area_code || phone_number` contains the needle, case-sensitive.
    PhoneContains(String),
}

impl ContactCondition {
    fn render(&self, sql: &mut String, values: &mut Vec<Value>) {
        match self {
            Self::AgendaIs(agenda_id) => {
                sql.push_str("agenda_id = ?");
                values.push(Value::Text(agenda_id.to_string()));
            }
            Self::NameContainsIgnoreCase(needle) => {
                sql.push_str("instr(name_key, ?) > 0");
                values.push(Value::Text(needle.clone()));
            }
            Self::PhoneContains(needle) => {
                sql.push_str("instr(area_code || phone_number, ?) > 0");
                values.push(Value::Text(needle.clone()));
            }
        }
    }
}

/// Conjunction of contact conditions scoped to one agenda.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFilter {
    conditions: Vec<ContactCondition>,
}

impl ContactFilter {
    /// Builds the filter used by contact listing.
    ///
    /// `None`, empty and whitespace-only needles add no condition.
    pub fn by(
        agenda_id: AgendaId,
        name_contains: Option<&str>,
        phone_contains: Option<&str>,
    ) -> Self {
        let mut conditions = vec![ContactCondition::AgendaIs(agenda_id)];

        if let Some(needle) = non_blank(name_contains) {
            conditions.push(ContactCondition::NameContainsIgnoreCase(name_key(needle)));
        }

        if let Some(needle) = non_blank(phone_contains) {
            conditions.push(ContactCondition::PhoneContains(needle.to_string()));
        }

        Self { conditions }
    }

    pub fn conditions(&self) -> &[ContactCondition] {
        &self.conditions
    }

    /// Renders `cond AND cond ...` and the values bound to its placeholders.
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let mut sql = String::new();
        let mut values = Vec::with_capacity(self.conditions.len());
        for (index, condition) in self.conditions.iter().enumerate() {
            if index > 0 {
                sql.push_str(" AND ");
            }
            condition.render(&mut sql, &mut values);
        }
        (sql, values)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
