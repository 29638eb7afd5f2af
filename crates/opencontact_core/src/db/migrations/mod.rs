//! Schema migrations for the agenda/contact store.
//!
//! # Responsibility
//! - Own the ordered list of schema steps (agendas first, then contacts,
//!   which reference them).
//! - Bring a database file up to the schema this binary understands, in one
//!   transaction.
//!
//! # Invariants
//! - Versions start at 1 and increase by exactly one per step.
//! - `PRAGMA user_version` always equals the last applied step.
//! - A file stamped with a newer version is never touched.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::{Connection, Transaction};

/// One schema step, shipped inside the binary.
#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    /// Short label used in migration log events.
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "agendas",
        sql: include_str!("0001_agendas.sql"),
    },
    Migration {
        version: 2,
        name: "contacts",
        sql: include_str!("0002_contacts.sql"),
    },
];

/// Schema version a fully migrated database reports.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings the database up to [`latest_version`].
///
/// Pending steps run in one transaction: either every one is applied or the
/// file keeps its previous version.
///
/// # Errors
/// - [`DbError::UnsupportedSchemaVersion`] when the file was written by a
///   newer binary.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = schema_version(conn)?;
    let latest = latest_version();

    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    if from_version == latest {
        debug!("event=db_migrate module=db status=up_to_date version={latest}");
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in pending(from_version) {
        apply_one(&tx, migration)?;
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={from_version} to_version={latest}");
    Ok(())
}

fn pending(from_version: u32) -> impl Iterator<Item = &'static Migration> {
    MIGRATIONS
        .iter()
        .filter(move |migration| migration.version > from_version)
}

fn apply_one(tx: &Transaction<'_>, migration: &Migration) -> DbResult<()> {
    tx.execute_batch(migration.sql)?;
    tx.pragma_update(None, "user_version", migration.version)?;
    info!(
        "event=db_migration_applied module=db version={} name={}",
        migration.version, migration.name
    );
    Ok(())
}

fn schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
