//! Contact repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD, phone-triple lookups and filtered listing over `contacts`.
//! - Own the prefix bulk delete used for agenda clean-up.
//!
//! # Invariants
//! - Write paths call `ContactInfo::validate()` before SQL mutations.
//! - Filtered listing evaluates `ContactFilter` in SQL, with count and page
//!   drawn from the same WHERE clause.
//! - `agenda_id` is never changed by an update.

use crate::model::agenda::AgendaId;
use crate::model::contact::{Contact, ContactId, ContactInfo, ContactType};
use crate::model::validation::name_key;
use crate::repo::contact_filter::ContactFilter;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::page::{Page, PageRequest, SortField};
use crate::repo::{count_to_u64, ensure_connection_ready, parse_uuid, NOW_MS_SQL};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use uuid::Uuid;

const CONTACT_COLUMNS: &str =
    "uuid, agenda_id, name, type, area_code, phone_number, created_at, updated_at";

/// Sortable contact columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContactSort {
    #[default]
    Name,
    Type,
    AreaCode,
    PhoneNumber,
    CreatedAt,
    UpdatedAt,
}

impl SortField for ContactSort {
    fn column(self) -> &'static str {
        match self {
            Self::Name => "name_key",
            Self::Type => "type",
            Self::AreaCode => "area_code",
            Self::PhoneNumber => "phone_number",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Self::Name),
            "type" => Some(Self::Type),
            "areaCode" => Some(Self::AreaCode),
            "phoneNumber" => Some(Self::PhoneNumber),
            "createdAt" => Some(Self::CreatedAt),
            "updatedAt" => Some(Self::UpdatedAt),
            _ => None,
        }
    }
}

/// Persistence gateway for contacts.
pub trait ContactRepository {
    /// Inserts a contact owned by `agenda_id` and returns the stored row.
    fn create_contact(&self, agenda_id: AgendaId, info: &ContactInfo) -> RepoResult<Contact>;
    /// Persists name/type/area code/phone number and returns the stored row.
    fn update_contact(&self, contact: &Contact) -> RepoResult<Contact>;
    fn find_by_id(&self, id: ContactId) -> RepoResult<Option<Contact>>;
    fn exists_by_id(&self, id: ContactId) -> RepoResult<bool>;
    /// Whether the phone triple is already taken.
    fn exists_by_phone(
        &self,
        agenda_id: AgendaId,
        area_code: &str,
        phone_number: &str,
    ) -> RepoResult<bool>;
    /// Contact currently holding the phone triple, if any.
    fn find_by_phone(
        &self,
        agenda_id: AgendaId,
        area_code: &str,
        phone_number: &str,
    ) -> RepoResult<Option<Contact>>;
    /// Whether the agenda owns at least one contact.
    fn exists_by_agenda_id(&self, agenda_id: AgendaId) -> RepoResult<bool>;
    fn find_all(
        &self,
        filter: &ContactFilter,
        request: &PageRequest<ContactSort>,
    ) -> RepoResult<Page<Contact>>;
    /// Deletes one contact. Fails with `NotFound` when no row matched.
    fn delete_by_id(&self, id: ContactId) -> RepoResult<()>;
    /// Deletes contacts of `agenda_id` whose name starts with `prefix`,
    /// ignoring case. Returns the number of deleted rows.
    fn delete_by_agenda_id_and_name_prefix(
        &self,
        agenda_id: AgendaId,
        prefix: &str,
    ) -> RepoResult<usize>;
}

/// SQLite-backed contact repository.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn create_contact(&self, agenda_id: AgendaId, info: &ContactInfo) -> RepoResult<Contact> {
        info.validate()?;

        let contact = self.conn.query_row(
            &format!(
                "INSERT INTO contacts (
                    uuid,
                    agenda_id,
                    name,
                    name_key,
                    type,
                    area_code,
                    phone_number,
                    created_at,
                    updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, {NOW_MS_SQL}, {NOW_MS_SQL})
                RETURNING {CONTACT_COLUMNS};"
            ),
            params![
                Uuid::new_v4().to_string(),
                agenda_id.to_string(),
                info.name.as_str(),
                name_key(&info.name),
                contact_type_to_db(info.kind),
                info.area_code.as_str(),
                info.phone_number.as_str(),
            ],
            |row| Ok(parse_contact_row(row)),
        )??;

        Ok(contact)
    }

    fn update_contact(&self, contact: &Contact) -> RepoResult<Contact> {
        contact.info.validate()?;

        let updated = self
            .conn
            .query_row(
                &format!(
                    "UPDATE contacts
                     SET
                        name = ?2,
                        name_key = ?3,
                        type = ?4,
                        area_code = ?5,
                        phone_number = ?6,
                        updated_at = MAX({NOW_MS_SQL}, updated_at + 1)
                     WHERE uuid = ?1
                     RETURNING {CONTACT_COLUMNS};"
                ),
                params![
                    contact.id.to_string(),
                    contact.info.name.as_str(),
                    name_key(&contact.info.name),
                    contact_type_to_db(contact.info.kind),
                    contact.info.area_code.as_str(),
                    contact.info.phone_number.as_str(),
                ],
                |row| Ok(parse_contact_row(row)),
            )
            .optional()?;

        match updated {
            Some(row) => row,
            None => Err(RepoError::NotFound {
                table: "contacts",
                id: contact.id,
            }),
        }
    }

    fn find_by_id(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        self.query_one(
            &format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE uuid = ?1;"),
            vec![Value::Text(id.to_string())],
        )
    }

    fn exists_by_id(&self, id: ContactId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM contacts WHERE uuid = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn exists_by_phone(
        &self,
        agenda_id: AgendaId,
        area_code: &str,
        phone_number: &str,
    ) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM contacts
                WHERE agenda_id = ?1
                  AND area_code = ?2
                  AND phone_number = ?3
            );",
            params![agenda_id.to_string(), area_code, phone_number],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn find_by_phone(
        &self,
        agenda_id: AgendaId,
        area_code: &str,
        phone_number: &str,
    ) -> RepoResult<Option<Contact>> {
        self.query_one(
            &format!(
                "SELECT {CONTACT_COLUMNS}
                 FROM contacts
                 WHERE agenda_id = ?1
                   AND area_code = ?2
                   AND phone_number = ?3;"
            ),
            vec![
                Value::Text(agenda_id.to_string()),
                Value::Text(area_code.to_string()),
                Value::Text(phone_number.to_string()),
            ],
        )
    }

    fn exists_by_agenda_id(&self, agenda_id: AgendaId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM contacts WHERE agenda_id = ?1);",
            [agenda_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn find_all(
        &self,
        filter: &ContactFilter,
        request: &PageRequest<ContactSort>,
    ) -> RepoResult<Page<Contact>> {
        let (where_sql, where_values) = filter.to_sql();

        let total: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM contacts WHERE {where_sql};"),
            params_from_iter(where_values.iter()),
            |row| row.get(0),
        )?;

        let sql = format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE {where_sql}{} LIMIT ? OFFSET ?;",
            request.sort.order_by_sql()
        );
        let mut bind_values = where_values;
        bind_values.push(Value::Integer(i64::from(request.size)));
        bind_values.push(Value::Integer(request.offset()));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next()? {
            contacts.push(parse_contact_row(row)?);
        }

        Ok(Page::new(contacts, request, count_to_u64(total)?))
    }

    fn delete_by_id(&self, id: ContactId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM contacts WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                table: "contacts",
                id,
            });
        }

        Ok(())
    }

    fn delete_by_agenda_id_and_name_prefix(
        &self,
        agenda_id: AgendaId,
        prefix: &str,
    ) -> RepoResult<usize> {
        let deleted = self.conn.execute(
            "DELETE FROM contacts
             WHERE agenda_id = ?1
               AND substr(name_key, 1, length(?2)) = ?2;",
            params![agenda_id.to_string(), name_key(prefix)],
        )?;
        Ok(deleted)
    }
}

impl SqliteContactRepository<'_> {
    fn query_one(&self, sql: &str, values: Vec<Value>) -> RepoResult<Option<Contact>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(values))?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_contact_row(row)?)),
            None => Ok(None),
        }
    }
}

fn parse_contact_row(row: &Row<'_>) -> RepoResult<Contact> {
    let uuid_text: String = row.get("uuid")?;
    let agenda_text: String = row.get("agenda_id")?;

    let type_text: String = row.get("type")?;
    let kind = parse_contact_type(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid contact type `{type_text}` in contacts.type"))
    })?;

    Ok(Contact {
        id: parse_uuid(&uuid_text, "contacts.uuid")?,
        agenda_id: parse_uuid(&agenda_text, "contacts.agenda_id")?,
        info: ContactInfo {
            name: row.get("name")?,
            kind,
            area_code: row.get("area_code")?,
            phone_number: row.get("phone_number")?,
        },
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn contact_type_to_db(kind: ContactType) -> &'static str {
    match kind {
        ContactType::Mobile => "MOBILE",
        ContactType::FixedLine => "FIXED_LINE",
        ContactType::Fax => "FAX",
    }
}

fn parse_contact_type(value: &str) -> Option<ContactType> {
    match value {
        "MOBILE" => Some(ContactType::Mobile),
        "FIXED_LINE" => Some(ContactType::FixedLine),
        "FAX" => Some(ContactType::Fax),
        _ => None,
    }
}
