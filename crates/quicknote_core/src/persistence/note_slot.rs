//! JSON note slot adapter.
//!
//! # Responsibility
//! - Serialize the ordered collection as a JSON array under one key.
//! - Classify unreadable slots as `CorruptState` so callers can pick a
//!   recovery policy.
//! - Copy raw slot payloads aside before they are overwritten.
//!
//! # Invariants
//! - `load(save(notes)) == notes` for every collection produced by the store.
//! - Note content never appears in log lines.

use crate::model::note::{Note, NoteId, NoteValidationError};
use crate::storage::{KeyValueStorage, StorageError};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default slot name for the note collection.
pub const NOTES_STORAGE_KEY: &str = "notes";

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Why a slot could not be turned into a note collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorruptReason {
    /// Slot was never written, or holds only whitespace.
    EmptySlot,
    /// Slot is not a JSON array of note objects.
    Malformed(String),
    /// Two records share one id.
    DuplicateId(NoteId),
    /// One record violates note invariants.
    InvalidNote(NoteValidationError),
}

impl CorruptReason {
    /// Returns whether the slot held a payload worth backing up.
    pub fn has_payload(&self) -> bool {
        !matches!(self, Self::EmptySlot)
    }

    fn code(&self) -> &'static str {
        match self {
            Self::EmptySlot => "empty_slot",
            Self::Malformed(_) => "malformed",
            Self::DuplicateId(_) => "duplicate_id",
            Self::InvalidNote(_) => "invalid_note",
        }
    }
}

impl Display for CorruptReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySlot => write!(f, "slot is empty"),
            Self::Malformed(details) => write!(f, "malformed payload: {details}"),
            Self::DuplicateId(id) => write!(f, "duplicate note id: {id}"),
            Self::InvalidNote(err) => write!(f, "{err}"),
        }
    }
}

/// Errors raised by the persistence adapter.
#[derive(Debug)]
pub enum PersistenceError {
    /// Slot content cannot be trusted as a note collection.
    CorruptState(CorruptReason),
    /// Underlying storage failed.
    Storage(StorageError),
    /// Collection could not be encoded.
    Serialize(serde_json::Error),
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CorruptState(reason) => write!(f, "corrupt note state: {reason}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to encode notes: {err}"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CorruptState(_) => None,
            Self::Storage(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<StorageError> for PersistenceError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Reads and writes the note collection in one storage slot.
pub struct PersistenceAdapter<S: KeyValueStorage> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> PersistenceAdapter<S> {
    /// Creates an adapter over the default `notes` slot.
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, NOTES_STORAGE_KEY)
    }

    /// Creates an adapter over a custom slot name.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Loads and validates the ordered collection.
    ///
    /// # Errors
    /// - `CorruptState(EmptySlot)` when the slot is absent or blank.
    /// - `CorruptState(..)` when the payload cannot be decoded or breaks
    ///   note invariants.
    /// - `Storage` when the storage facility fails.
    pub fn load(&self) -> PersistenceResult<Vec<Note>> {
        let raw = self.storage.get_item(&self.key)?;
        let result = raw
            .as_deref()
            .ok_or(CorruptReason::EmptySlot)
            .and_then(decode_notes);

        match result {
            Ok(notes) => {
                info!(
                    "event=slot_load module=persistence status=ok key={} count={}",
                    self.key,
                    notes.len()
                );
                Ok(notes)
            }
            Err(reason) => {
                warn!(
                    "event=slot_load module=persistence status=corrupt key={} reason={}",
                    self.key,
                    reason.code()
                );
                Err(PersistenceError::CorruptState(reason))
            }
        }
    }

    /// Overwrites the slot with the full collection.
    pub fn save(&mut self, notes: &[Note]) -> PersistenceResult<()> {
        let payload = serde_json::to_string(notes).map_err(PersistenceError::Serialize)?;
        self.storage.set_item(&self.key, &payload)?;
        debug!(
            "event=slot_save module=persistence status=ok key={} count={} bytes={}",
            self.key,
            notes.len(),
            payload.len()
        );
        Ok(())
    }

    /// Copies the raw slot value to `<key>.<suffix>`.
    ///
    /// An occupied backup key holding a different payload is kept; the copy
    /// goes to the first free `<key>.<suffix>.<n>` instead. A backup that
    /// already holds the same payload is reused.
    ///
    /// Returns the backup key, or `None` when there was nothing to copy.
    pub fn backup_raw(&mut self, suffix: &str) -> PersistenceResult<Option<String>> {
        let Some(raw) = self.storage.get_item(&self.key)? else {
            return Ok(None);
        };
        let base_key = format!("{}.{}", self.key, suffix);
        let mut backup_key = base_key.clone();
        let mut attempt: u32 = 0;
        loop {
            match self.storage.get_item(&backup_key)? {
                None => break,
                Some(existing) if existing == raw => {
                    debug!(
                        "event=slot_backup module=persistence status=reused key={} backup_key={}",
                        self.key, backup_key
                    );
                    return Ok(Some(backup_key));
                }
                Some(_) => {
                    attempt += 1;
                    backup_key = format!("{base_key}.{attempt}");
                }
            }
        }

        self.storage.set_item(&backup_key, &raw)?;
        info!(
            "event=slot_backup module=persistence status=ok key={} backup_key={} bytes={}",
            self.key,
            backup_key,
            raw.len()
        );
        Ok(Some(backup_key))
    }
}

fn decode_notes(raw: &str) -> Result<Vec<Note>, CorruptReason> {
    if raw.trim().is_empty() {
        return Err(CorruptReason::EmptySlot);
    }

    let notes: Vec<Note> =
        serde_json::from_str(raw).map_err(|err| CorruptReason::Malformed(err.to_string()))?;

    let mut seen = HashSet::with_capacity(notes.len());
    for note in &notes {
        note.validate().map_err(CorruptReason::InvalidNote)?;
        if !seen.insert(note.id()) {
            return Err(CorruptReason::DuplicateId(note.id().clone()));
        }
    }

    Ok(notes)
}
