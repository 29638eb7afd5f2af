//! Shared request state and the blocking bridge into core services.

use crate::error::ApiError;
use opencontact_core::db::{connect_db, open_db, read_transaction, write_transaction, DbResult};
use opencontact_core::{
    AgendaService, ContactService, RepoResult, ServiceResult, SqliteAgendaRepository,
    SqliteContactRepository,
};
use rusqlite::{Connection, Transaction};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// State cloned into every handler.
///
/// Only built through [`AppState::open`], so the file is migrated before the
/// first request and each request can take the light `connect_db` path.
#[derive(Debug, Clone)]
pub struct AppState {
    db_path: Arc<PathBuf>,
}

impl AppState {
    /// Opens the database once, applying pending migrations.
    ///
    /// # Errors
    /// Fails on an unreadable file or a schema newer than this binary.
    pub fn open(db_path: impl Into<PathBuf>) -> DbResult<Self> {
        let db_path = db_path.into();
        drop(open_db(&db_path)?);
        Ok(Self {
            db_path: Arc::new(db_path),
        })
    }

    pub fn db_path(&self) -> &Path {
        self.db_path.as_path()
    }

    /// Runs a mutating use-case inside one immediate write transaction.
    pub(crate) async fn write<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: for<'c> FnOnce(&Services<'c>) -> ServiceResult<T> + Send + 'static,
    {
        self.run(TxMode::Write, op).await
    }

    /// Runs a read-only use-case inside one deferred transaction.
    pub(crate) async fn read<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: for<'c> FnOnce(&Services<'c>) -> ServiceResult<T> + Send + 'static,
    {
        self.run(TxMode::Read, op).await
    }

    async fn run<T, F>(&self, mode: TxMode, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: for<'c> FnOnce(&Services<'c>) -> ServiceResult<T> + Send + 'static,
    {
        let db_path = Arc::clone(&self.db_path);
        let outcome = tokio::task::spawn_blocking(move || -> ServiceResult<T> {
            let mut conn = connect_db(db_path.as_path())?;
            let scope = |tx: &Transaction<'_>| -> ServiceResult<T> {
                let services = Services::try_new(tx)?;
                op(&services)
            };
            match mode {
                TxMode::Write => write_transaction(&mut conn, scope),
                TxMode::Read => read_transaction(&mut conn, scope),
            }
        })
        .await
        .map_err(ApiError::from)?;

        outcome.map_err(ApiError::from)
    }
}

#[derive(Debug, Clone, Copy)]
enum TxMode {
    Write,
    Read,
}

/// Both services bound to one transaction.
pub(crate) struct Services<'conn> {
    pub agendas: AgendaService<SqliteAgendaRepository<'conn>, SqliteContactRepository<'conn>>,
    pub contacts: ContactService<SqliteContactRepository<'conn>, SqliteAgendaRepository<'conn>>,
}

impl<'conn> Services<'conn> {
    fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self {
            agendas: AgendaService::new(
                SqliteAgendaRepository::try_new(conn)?,
                SqliteContactRepository::try_new(conn)?,
            ),
            contacts: ContactService::new(
                SqliteContactRepository::try_new(conn)?,
                SqliteAgendaRepository::try_new(conn)?,
            ),
        })
    }
}
