//! Transaction scopes for service calls.
//!
//! # Responsibility
//! - Run one use-case closure against a single SQLite transaction.
//! - Commit only when the closure succeeds; any error rolls back on drop.
//!
//! # Invariants
//! - Write scopes take the RESERVED lock up front (`BEGIN IMMEDIATE`), so the
//!   pre-checks and the write of one use-case see the same snapshot.
//! - Read scopes are never committed and hold no write lock.

use super::DbError;
use log::{debug, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Runs `op` inside an immediate write transaction and commits on success.
///
/// # Errors
/// - Returns `op`'s error unchanged after rolling back.
/// - Returns a converted [`DbError`] when begin or commit fails.
pub fn write_transaction<T, E, F>(conn: &mut Connection, op: F) -> Result<T, E>
where
    E: From<DbError>,
    F: FnOnce(&Transaction<'_>) -> Result<T, E>,
{
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(DbError::from)?;

    match op(&tx) {
        Ok(value) => {
            tx.commit().map_err(DbError::from)?;
            debug!("event=tx_commit module=db status=ok mode=write");
            Ok(value)
        }
        Err(err) => {
            // Dropping the transaction rolls it back.
            drop(tx);
            warn!("event=tx_rollback module=db status=error mode=write");
            Err(err)
        }
    }
}

/// Runs `op` inside a deferred transaction that is always rolled back.
///
/// Gives multi-statement reads (page + count) one consistent snapshot.
pub fn read_transaction<T, E, F>(conn: &mut Connection, op: F) -> Result<T, E>
where
    E: From<DbError>,
    F: FnOnce(&Transaction<'_>) -> Result<T, E>,
{
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Deferred)
        .map_err(DbError::from)?;
    op(&tx)
}
