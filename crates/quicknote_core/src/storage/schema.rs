//! Slot table schema for `SqliteStorage`.
//!
//! # Responsibility
//! - Bring a connection up to the slot schema this binary writes.
//! - Refuse files written by a newer schema instead of guessing.
//!
//! # Invariants
//! - The schema version lives in `PRAGMA user_version`.
//! - `UPGRADES[n]` lifts a file from version `n` to `n + 1`; steps are only
//!   ever appended.
//! - All pending steps and the version bump commit in one transaction.

use super::{StorageError, StorageResult};
use log::debug;
use rusqlite::Connection;

/// Table holding one row per slot key.
pub const SLOT_TABLE: &str = "storage_slots";

const UPGRADES: &[&str] = &[
    // 0 -> 1
    "CREATE TABLE IF NOT EXISTS storage_slots (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL,
        updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
    );",
];

/// Schema version written by this binary.
pub const SLOT_SCHEMA_VERSION: u32 = UPGRADES.len() as u32;

/// Reads the schema version recorded in the file.
pub fn schema_version(conn: &Connection) -> StorageResult<u32> {
    let version = conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Runs pending upgrade steps and checks the slot table is in place.
///
/// # Errors
/// - `StorageError::SchemaTooNew` when the file is ahead of this binary.
/// - `StorageError::MissingRequiredTable` when the recorded version claims a
///   schema the file does not have.
pub(crate) fn prepare_slot_schema(conn: &mut Connection) -> StorageResult<()> {
    let found = schema_version(conn)?;
    if found > SLOT_SCHEMA_VERSION {
        return Err(StorageError::SchemaTooNew {
            found,
            supported: SLOT_SCHEMA_VERSION,
        });
    }

    let pending = &UPGRADES[found as usize..];
    if !pending.is_empty() {
        let tx = conn.transaction()?;
        for step in pending {
            tx.execute_batch(step)?;
        }
        tx.pragma_update(None, "user_version", SLOT_SCHEMA_VERSION)?;
        tx.commit()?;
        debug!(
            "event=slot_schema_upgrade module=storage status=ok from_version={found} to_version={SLOT_SCHEMA_VERSION}"
        );
    }

    ensure_slot_table(conn)
}

fn ensure_slot_table(conn: &Connection) -> StorageResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [SLOT_TABLE],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(StorageError::MissingRequiredTable(SLOT_TABLE));
    }
    Ok(())
}
