//! SQLite-backed key-value storage.
//!
//! # Responsibility
//! - Open file or in-memory connections and prepare the slot schema on them.
//! - Persist slots in the `storage_slots` table.
//!
//! # Invariants
//! - No slot is read or written before the schema is prepared.
//! - One row per key; writes are upserts.
//! - Every open attempt emits exactly one terminal `storage_open` event.

use super::schema::prepare_slot_schema;
use super::{KeyValueStorage, StorageResult};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Durable slot storage over one SQLite connection.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens a database file, creating it when missing.
    ///
    /// Parent directories are not created.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        Self::connect("file", || Connection::open(path))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::connect("memory", Connection::open_in_memory)
    }

    /// Adopts a caller-provided connection, preparing the slot schema on it.
    pub fn try_new(mut conn: Connection) -> StorageResult<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        prepare_slot_schema(&mut conn)?;
        Ok(Self { conn })
    }

    /// Read access to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn connect(
        mode: &'static str,
        open: impl FnOnce() -> rusqlite::Result<Connection>,
    ) -> StorageResult<Self> {
        let started_at = Instant::now();
        info!("event=storage_open module=storage status=start mode={mode}");

        let storage = open().map_err(Into::into).and_then(Self::try_new);
        match &storage {
            Ok(_) => info!(
                "event=storage_open module=storage status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=storage_open module=storage status=error mode={mode} duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            ),
        }
        storage
    }
}

impl KeyValueStorage for SqliteStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM storage_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO storage_slots (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM storage_slots WHERE key = ?1;", [key])?;
        Ok(())
    }
}
