//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define the persistence gateways the services depend on.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes validate input before any SQL mutation.
//! - Constraint failures surface as `RepoError::Constraint` so services can
//!   translate them into the same conflicts as their pre-checks.

pub mod agenda_repo;
pub mod contact_filter;
pub mod contact_repo;
pub mod error;
pub mod page;

use crate::db::migrations::latest_version;
use error::{RepoError, RepoResult};
use rusqlite::Connection;
use uuid::Uuid;

/// Current time as epoch milliseconds, evaluated by SQLite.
pub(crate) const NOW_MS_SQL: &str = "CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER)";

pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn count_to_u64(count: i64) -> RepoResult<u64> {
    u64::try_from(count).map_err(|_| RepoError::InvalidData(format!("negative row count {count}")))
}
