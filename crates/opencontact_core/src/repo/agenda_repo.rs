//! Agenda repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and lookup APIs over the `agendas` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Name comparisons use the `name_key` column, matching the unique index;
//!   writes always store `name_key(name)` next to `name`.
//! - `updated_at` strictly increases on every successful update.

use crate::model::agenda::{Agenda, AgendaId};
use crate::model::validation::name_key;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::page::{Page, PageRequest, SortField};
use crate::repo::{count_to_u64, ensure_connection_ready, parse_uuid, NOW_MS_SQL};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const AGENDA_COLUMNS: &str = "uuid, name, created_at, updated_at";

/// Sortable agenda columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgendaSort {
    #[default]
    Name,
    CreatedAt,
    UpdatedAt,
}

impl SortField for AgendaSort {
    fn column(self) -> &'static str {
        match self {
            // Case-insensitive so "alpha" and "Beta" interleave naturally.
            Self::Name => "name_key",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Self::Name),
            "createdAt" => Some(Self::CreatedAt),
            "updatedAt" => Some(Self::UpdatedAt),
            _ => None,
        }
    }
}

/// Persistence gateway for agendas.
pub trait AgendaRepository {
    /// Inserts a new agenda with a generated id and returns the stored row.
    fn create_agenda(&self, name: &str) -> RepoResult<Agenda>;
    /// Persists the agenda's name and returns the stored row.
    fn update_agenda(&self, agenda: &Agenda) -> RepoResult<Agenda>;
    fn find_by_id(&self, id: AgendaId) -> RepoResult<Option<Agenda>>;
    fn exists_by_id(&self, id: AgendaId) -> RepoResult<bool>;
    fn exists_by_name_ignore_case(&self, name: &str) -> RepoResult<bool>;
    fn find_by_name_ignore_case(&self, name: &str) -> RepoResult<Option<Agenda>>;
    fn find_all(&self, request: &PageRequest<AgendaSort>) -> RepoResult<Page<Agenda>>;
    /// Deletes one agenda. Fails with `NotFound` when no row matched.
    fn delete_by_id(&self, id: AgendaId) -> RepoResult<()>;
}

/// SQLite-backed agenda repository.
///
/// Borrows a connection or a transaction (via deref), so several
/// repositories can share one transaction.
pub struct SqliteAgendaRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAgendaRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `RepoError::UninitializedConnection` when migrations have not run.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl AgendaRepository for SqliteAgendaRepository<'_> {
    fn create_agenda(&self, name: &str) -> RepoResult<Agenda> {
        Agenda::validate_name(name)?;

        let agenda = self.conn.query_row(
            &format!(
                "INSERT INTO agendas (uuid, name, name_key, created_at, updated_at)
                 VALUES (?1, ?2, ?3, {NOW_MS_SQL}, {NOW_MS_SQL})
                 RETURNING {AGENDA_COLUMNS};"
            ),
            params![Uuid::new_v4().to_string(), name, name_key(name)],
            |row| Ok(parse_agenda_row(row)),
        )??;

        Ok(agenda)
    }

    fn update_agenda(&self, agenda: &Agenda) -> RepoResult<Agenda> {
        Agenda::validate_name(&agenda.name)?;

        let updated = self
            .conn
            .query_row(
                &format!(
                    "UPDATE agendas
                     SET
                        name = ?2,
                        name_key = ?3,
                        updated_at = MAX({NOW_MS_SQL}, updated_at + 1)
                     WHERE uuid = ?1
                     RETURNING {AGENDA_COLUMNS};"
                ),
                params![
                    agenda.id.to_string(),
                    agenda.name.as_str(),
                    name_key(&agenda.name)
                ],
                |row| Ok(parse_agenda_row(row)),
            )
            .optional()?;

        match updated {
            Some(row) => row,
            None => Err(RepoError::NotFound {
                table: "agendas",
                id: agenda.id,
            }),
        }
    }

    fn find_by_id(&self, id: AgendaId) -> RepoResult<Option<Agenda>> {
        self.query_one(
            &format!("SELECT {AGENDA_COLUMNS} FROM agendas WHERE uuid = ?1;"),
            &id.to_string(),
        )
    }

    fn exists_by_id(&self, id: AgendaId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM agendas WHERE uuid = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn exists_by_name_ignore_case(&self, name: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM agendas WHERE name_key = ?1);",
            [name_key(name)],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn find_by_name_ignore_case(&self, name: &str) -> RepoResult<Option<Agenda>> {
        self.query_one(
            &format!("SELECT {AGENDA_COLUMNS} FROM agendas WHERE name_key = ?1;"),
            &name_key(name),
        )
    }

    fn find_all(&self, request: &PageRequest<AgendaSort>) -> RepoResult<Page<Agenda>> {
        let total: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM agendas;", [], |row| row.get(0))?;

        let sql = format!(
            "SELECT {AGENDA_COLUMNS} FROM agendas{} LIMIT ?1 OFFSET ?2;",
            request.sort.order_by_sql()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![i64::from(request.size), request.offset()])?;
        let mut agendas = Vec::new();
        while let Some(row) = rows.next()? {
            agendas.push(parse_agenda_row(row)?);
        }

        Ok(Page::new(agendas, request, count_to_u64(total)?))
    }

    fn delete_by_id(&self, id: AgendaId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM agendas WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                table: "agendas",
                id,
            });
        }

        Ok(())
    }
}

impl SqliteAgendaRepository<'_> {
    fn query_one(&self, sql: &str, param: &str) -> RepoResult<Option<Agenda>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([param])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_agenda_row(row)?)),
            None => Ok(None),
        }
    }
}

fn parse_agenda_row(row: &Row<'_>) -> RepoResult<Agenda> {
    let uuid_text: String = row.get("uuid")?;
    Ok(Agenda {
        id: parse_uuid(&uuid_text, "agendas.uuid")?,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
