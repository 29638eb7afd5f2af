//! Service-level error taxonomy returned to the presentation layer.

use crate::db::DbError;
use crate::model::agenda::AgendaId;
use crate::model::contact::ContactId;
use crate::model::validation::ValidationError;
use crate::repo::error::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Coarse category of a [`ServiceError`], used to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Validation,
    Internal,
}

/// Errors raised by agenda and contact use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Referenced agenda does not exist.
    AgendaNotFound(AgendaId),
    /// Referenced contact does not exist.
    ContactNotFound(ContactId),
    /// Another agenda already uses this name, ignoring case.
    NameConflict(String),
    /// Another contact in the agenda already holds this area code + number.
    PhoneConflict {
        agenda_id: AgendaId,
        area_code: String,
        phone_number: String,
    },
    /// Agenda still owns contacts and cannot be deleted.
    DependencyConflict(AgendaId),
    /// Input failed structural validation.
    Validation(ValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AgendaNotFound(_) | Self::ContactNotFound(_) => ErrorKind::NotFound,
            Self::NameConflict(_) | Self::PhoneConflict { .. } | Self::DependencyConflict(_) => {
                ErrorKind::Conflict
            }
            Self::Validation(_) => ErrorKind::Validation,
            Self::Repo(_) => ErrorKind::Internal,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AgendaNotFound(id) => write!(f, "Agenda not found with id: {id}"),
            Self::ContactNotFound(id) => write!(f, "Contact not found with id: {id}"),
            Self::NameConflict(name) => write!(f, "Agenda name '{name}' already exists."),
            Self::PhoneConflict { .. } => {
                write!(f, "Phone number already registered in this agenda.")
            }
            Self::DependencyConflict(_) => {
                write!(f, "Cannot delete agenda with associated contacts.")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound {
                table: "agendas",
                id,
            } => Self::AgendaNotFound(id),
            RepoError::NotFound {
                table: "contacts",
                id,
            } => Self::ContactNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(value: DbError) -> Self {
        Self::Repo(value.into())
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}
