//! Core domain logic for OpenContact.
//! This crate is the single source of truth for agenda/contact invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, init_stderr_logging, logging_status};
pub use model::agenda::{Agenda, AgendaId};
pub use model::contact::{Contact, ContactId, ContactInfo, ContactType};
pub use model::validation::ValidationError;
pub use repo::agenda_repo::{AgendaRepository, AgendaSort, SqliteAgendaRepository};
pub use repo::contact_filter::{ContactCondition, ContactFilter};
pub use repo::contact_repo::{ContactRepository, ContactSort, SqliteContactRepository};
pub use repo::error::{RepoError, RepoResult};
pub use repo::page::{Page, PageRequest, Sort, SortDirection, SortField};
pub use service::agenda_service::AgendaService;
pub use service::contact_service::ContactService;
pub use service::error::{ErrorKind, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
