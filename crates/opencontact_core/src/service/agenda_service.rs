//! Agenda use-case service.
//!
//! # Responsibility
//! - Enforce unique agenda names (ignoring case) on create and rename.
//! - Refuse to delete agendas that still own contacts.
//!
//! # Invariants
//! - Callers run mutating methods inside one write transaction
//!   (`db::write_transaction`); pre-checks and writes share it.
//! - Constraint failures at write time map to the same errors as the
//!   pre-checks.

use crate::db::ConstraintKind;
use crate::model::agenda::{Agenda, AgendaId};
use crate::repo::agenda_repo::{AgendaRepository, AgendaSort};
use crate::repo::contact_repo::ContactRepository;
use crate::repo::error::RepoError;
use crate::repo::page::{Page, PageRequest};
use crate::service::error::{ServiceError, ServiceResult};
use log::debug;

/// Agenda service facade over repository implementations.
pub struct AgendaService<A: AgendaRepository, C: ContactRepository> {
    agendas: A,
    contacts: C,
}

impl<A: AgendaRepository, C: ContactRepository> AgendaService<A, C> {
    pub fn new(agendas: A, contacts: C) -> Self {
        Self { agendas, contacts }
    }

    /// Creates an agenda with a unique name.
    ///
    /// # Errors
    /// - `NameConflict` when any agenda has the same name ignoring case.
    /// - `Validation` when the name is blank or too long.
    pub fn create(&self, name: &str) -> ServiceResult<Agenda> {
        Agenda::validate_name(name)?;

        if self.agendas.exists_by_name_ignore_case(name)? {
            debug!("event=agenda_create module=service status=rejected reason=name_conflict");
            return Err(ServiceError::NameConflict(name.to_string()));
        }

        self.agendas
            .create_agenda(name)
            .map_err(|err| name_conflict_or(err, name))
    }

    /// Gets one agenda or fails with `AgendaNotFound`.
    pub fn find_by_id(&self, id: AgendaId) -> ServiceResult<Agenda> {
        self.agendas
            .find_by_id(id)?
            .ok_or(ServiceError::AgendaNotFound(id))
    }

    /// Lists agendas in the order and window the request asks for.
    pub fn find_all(&self, request: &PageRequest<AgendaSort>) -> ServiceResult<Page<Agenda>> {
        Ok(self.agendas.find_all(request)?)
    }

    /// Renames an agenda.
    ///
    /// Renaming to the agenda's own name (in any case) is allowed.
    pub fn update(&self, id: AgendaId, new_name: &str) -> ServiceResult<Agenda> {
        Agenda::validate_name(new_name)?;
        let mut agenda = self.find_by_id(id)?;

        if let Some(existing) = self.agendas.find_by_name_ignore_case(new_name)? {
            if existing.id != agenda.id {
                debug!(
                    "event=agenda_update module=service status=rejected reason=name_conflict agenda_id={id}"
                );
                return Err(ServiceError::NameConflict(new_name.to_string()));
            }
        }

        agenda.rename(new_name);
        self.agendas
            .update_agenda(&agenda)
            .map_err(|err| name_conflict_or(err, new_name))
    }

    /// Deletes an agenda that owns no contacts.
    ///
    /// # Errors
    /// - `AgendaNotFound` when the id is unknown.
    /// - `DependencyConflict` when any contact references the agenda.
    pub fn delete(&self, id: AgendaId) -> ServiceResult<()> {
        if !self.agendas.exists_by_id(id)? {
            return Err(ServiceError::AgendaNotFound(id));
        }

        if self.contacts.exists_by_agenda_id(id)? {
            debug!(
                "event=agenda_delete module=service status=rejected reason=has_contacts agenda_id={id}"
            );
            return Err(ServiceError::DependencyConflict(id));
        }

        self.agendas.delete_by_id(id).map_err(|err| match err.constraint() {
            Some(ConstraintKind::ForeignKey) => ServiceError::DependencyConflict(id),
            _ => err.into(),
        })
    }
}

fn name_conflict_or(err: RepoError, name: &str) -> ServiceError {
    match err.constraint() {
        Some(ConstraintKind::Unique) => ServiceError::NameConflict(name.to_string()),
        _ => err.into(),
    }
}
