//! Synchronous key-value storage facility.
//!
//! # Responsibility
//! - Model the origin-scoped string slot store the persistence adapter
//!   writes to (`get_item`/`set_item`/`remove_item`).
//! - Provide a process-local map and a durable SQLite implementation.
//!
//! # Invariants
//! - `set_item` fully replaces the previous value of a key.
//! - Implementations never interpret slot values.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
pub mod schema;
pub mod sqlite_storage;

pub use memory::MemoryStorage;
pub use sqlite_storage::SqliteStorage;

pub type StorageResult<T> = Result<T, StorageError>;

/// Transport failure of the underlying storage facility.
#[derive(Debug)]
pub enum StorageError {
    Sqlite(rusqlite::Error),
    /// The file was written by a newer slot schema.
    SchemaTooNew { found: u32, supported: u32 },
    /// Connection is missing a table required by the slot schema.
    MissingRequiredTable(&'static str),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "storage schema version {found} is newer than supported {supported}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "storage connection is missing table `{table}`")
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// String slot storage keyed by name.
pub trait KeyValueStorage {
    /// Returns the stored value, or `None` when the key was never written.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    /// Overwrites the value stored under `key`.
    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()>;
    /// Removes `key`. Absent keys are a no-op.
    fn remove_item(&mut self, key: &str) -> StorageResult<()>;
}
