//! SQLite storage bootstrap, schema migrations and transaction boundaries.
//!
//! # Responsibility
//! - Open and configure SQLite connections for OpenContact core.
//! - Apply schema migrations in deterministic order.
//! - Provide the write/read transaction scopes services run inside.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write application data before migrations succeed.
//! - A mutating use-case runs inside exactly one `BEGIN IMMEDIATE` transaction.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
mod tx;

pub use open::{connect_db, open_db, open_db_in_memory};
pub use tx::{read_transaction, write_transaction};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl DbError {
    /// Classifies a constraint failure reported by SQLite, if any.
    pub fn constraint_kind(&self) -> Option<ConstraintKind> {
        match self {
            Self::Sqlite(err) => ConstraintKind::of(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Schema constraint families the repositories translate into domain errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// `UNIQUE` index or `PRIMARY KEY` collision.
    Unique,
    /// `FOREIGN KEY` reference missing or still referenced.
    ForeignKey,
}

impl ConstraintKind {
    // Extended result codes, see https://www.sqlite.org/rescode.html
    const SQLITE_CONSTRAINT_FOREIGNKEY: i32 = 787;
    const SQLITE_CONSTRAINT_PRIMARYKEY: i32 = 1555;
    const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;

    /// Returns the constraint family behind a SQLite failure, if any.
    pub fn of(err: &rusqlite::Error) -> Option<Self> {
        let rusqlite::Error::SqliteFailure(failure, _) = err else {
            return None;
        };
        if failure.code != rusqlite::ErrorCode::ConstraintViolation {
            return None;
        }

        match failure.extended_code {
            Self::SQLITE_CONSTRAINT_UNIQUE | Self::SQLITE_CONSTRAINT_PRIMARYKEY => {
                Some(Self::Unique)
            }
            Self::SQLITE_CONSTRAINT_FOREIGNKEY => Some(Self::ForeignKey),
            _ => None,
        }
    }
}
