//! Contact use-case service.
//!
//! # Responsibility
//! - Enforce the unique phone triple (agenda, area code, number).
//! - Require the owning agenda to exist for create, listing and bulk delete.
//!
//! # Invariants
//! - `create` checks the phone triple before agenda existence, so a
//!   colliding phone reports `PhoneConflict` even for an unknown agenda.
//! - `update` never moves a contact to another agenda.
//! - Contact listing is filtered by SQLite, never in memory.

use crate::db::ConstraintKind;
use crate::model::agenda::AgendaId;
use crate::model::contact::{Contact, ContactId, ContactInfo};
use crate::repo::agenda_repo::AgendaRepository;
use crate::repo::contact_filter::ContactFilter;
use crate::repo::contact_repo::{ContactRepository, ContactSort};
use crate::repo::page::{Page, PageRequest};
use crate::service::error::{ServiceError, ServiceResult};
use log::{debug, info};

/// Contact service facade over repository implementations.
pub struct ContactService<C: ContactRepository, A: AgendaRepository> {
    contacts: C,
    agendas: A,
}

impl<C: ContactRepository, A: AgendaRepository> ContactService<C, A> {
    pub fn new(contacts: C, agendas: A) -> Self {
        Self { contacts, agendas }
    }

    /// Creates a contact in an existing agenda.
    ///
    /// # Errors
    /// - `PhoneConflict` when the phone triple is taken (checked first).
    /// - `AgendaNotFound` when the agenda does not exist.
    /// - `Validation` when the info is malformed.
    pub fn create(&self, agenda_id: AgendaId, info: &ContactInfo) -> ServiceResult<Contact> {
        info.validate()?;

        if self
            .contacts
            .exists_by_phone(agenda_id, &info.area_code, &info.phone_number)?
        {
            debug!(
                "event=contact_create module=service status=rejected reason=phone_conflict agenda_id={agenda_id}"
            );
            return Err(phone_conflict(agenda_id, info));
        }

        if !self.agendas.exists_by_id(agenda_id)? {
            return Err(ServiceError::AgendaNotFound(agenda_id));
        }

        self.contacts
            .create_contact(agenda_id, info)
            .map_err(|err| match err.constraint() {
                Some(ConstraintKind::Unique) => phone_conflict(agenda_id, info),
                Some(ConstraintKind::ForeignKey) => ServiceError::AgendaNotFound(agenda_id),
                None => err.into(),
            })
    }

    /// Gets one contact or fails with `ContactNotFound`.
    pub fn find_by_id(&self, id: ContactId) -> ServiceResult<Contact> {
        self.contacts
            .find_by_id(id)?
            .ok_or(ServiceError::ContactNotFound(id))
    }

    /// Replaces a contact's name, type, area code and phone number.
    ///
    /// Keeping the contact's own phone triple is allowed.
    pub fn update(&self, id: ContactId, info: ContactInfo) -> ServiceResult<Contact> {
        info.validate()?;
        let mut contact = self.find_by_id(id)?;

        if let Some(holder) =
            self.contacts
                .find_by_phone(contact.agenda_id, &info.area_code, &info.phone_number)?
        {
            if holder.id != id {
                debug!(
                    "event=contact_update module=service status=rejected reason=phone_conflict contact_id={id}"
                );
                return Err(phone_conflict(contact.agenda_id, &info));
            }
        }

        let agenda_id = contact.agenda_id;
        contact.update_info(info);
        self.contacts
            .update_contact(&contact)
            .map_err(|err| match err.constraint() {
                Some(ConstraintKind::Unique) => phone_conflict(agenda_id, &contact.info),
                _ => err.into(),
            })
    }

    /// Deletes one contact. Contacts have no dependents.
    pub fn delete(&self, id: ContactId) -> ServiceResult<()> {
        if !self.contacts.exists_by_id(id)? {
            return Err(ServiceError::ContactNotFound(id));
        }
        Ok(self.contacts.delete_by_id(id)?)
    }

    /// Lists an agenda's contacts, optionally narrowed by name and phone
    /// substrings.
    pub fn find_all_by_criteria(
        &self,
        agenda_id: AgendaId,
        name_contains: Option<&str>,
        phone_contains: Option<&str>,
        request: &PageRequest<ContactSort>,
    ) -> ServiceResult<Page<Contact>> {
        if !self.agendas.exists_by_id(agenda_id)? {
            return Err(ServiceError::AgendaNotFound(agenda_id));
        }

        let filter = ContactFilter::by(agenda_id, name_contains, phone_contains);
        Ok(self.contacts.find_all(&filter, request)?)
    }

    /// Deletes every contact of the agenda whose name starts with `prefix`,
    /// ignoring case. An empty prefix matches every contact of the agenda.
    ///
    /// Returns the number of deleted contacts.
    pub fn delete_contacts_by_name_prefix(
        &self,
        agenda_id: AgendaId,
        prefix: &str,
    ) -> ServiceResult<usize> {
        self.agendas
            .find_by_id(agenda_id)?
            .ok_or(ServiceError::AgendaNotFound(agenda_id))?;

        let deleted = self
            .contacts
            .delete_by_agenda_id_and_name_prefix(agenda_id, prefix)?;
        info!(
            "event=contact_prefix_delete module=service status=ok agenda_id={agenda_id} deleted={deleted}"
        );
        Ok(deleted)
    }
}

fn phone_conflict(agenda_id: AgendaId, info: &ContactInfo) -> ServiceError {
    ServiceError::PhoneConflict {
        agenda_id,
        area_code: info.area_code.clone(),
        phone_number: info.phone_number.clone(),
    }
}
