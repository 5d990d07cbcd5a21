//! Ordered note store.
//!
//! # Responsibility
//! - Provide add/edit/delete/find over the in-memory collection.
//! - Reject blank content before any record is created or replaced.
//!
//! # Invariants
//! - Exactly one note per id.
//! - Edit replaces the record with a new value (remove + re-insert at front);
//!   snapshots handed out earlier are never mutated.
//! - The store does not persist; callers sync after a successful mutation.

use crate::model::note::{now_millis, Note, NoteId};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by note store mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Target note does not exist.
    NotFound(NoteId),
    /// Content is empty after trimming.
    EmptyContent,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::EmptyContent => write!(f, "note content must not be empty"),
        }
    }
}

impl Error for StoreError {}

/// Most-recent-first collection of notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteStore {
    notes: Vec<Note>,
}

impl NoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a store from a collection that passed slot validation.
    pub(crate) fn from_notes(notes: Vec<Note>) -> Self {
        Self { notes }
    }

    /// Creates a note and inserts it at the front.
    pub fn add(&mut self, content: impl Into<String>) -> StoreResult<Note> {
        let content = ensure_content(content.into())?;
        let note = Note::create(content, now_millis());
        self.notes.insert(0, note.clone());
        debug!(
            "event=note_add module=store status=ok note_id={} count={}",
            note.id(),
            self.notes.len()
        );
        Ok(note)
    }

    /// Replaces the content of an existing note and moves it to the front.
    pub fn edit(&mut self, id: &NoteId, content: impl Into<String>) -> StoreResult<Note> {
        let content = ensure_content(content.into())?;
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let previous = self.notes.remove(index);
        let revised = previous.revised(content, now_millis());
        self.notes.insert(0, revised.clone());
        debug!(
            "event=note_edit module=store status=ok note_id={} from_index={}",
            id, index
        );
        Ok(revised)
    }

    /// Removes a note if present. Absent ids are a no-op.
    pub fn delete(&mut self, id: &NoteId) -> Option<Note> {
        let removed = self.position(id).map(|index| self.notes.remove(index));
        debug!(
            "event=note_delete module=store status={} note_id={}",
            if removed.is_some() { "ok" } else { "noop" },
            id
        );
        removed
    }

    /// Read-only view in current order.
    pub fn list(&self) -> &[Note] {
        &self.notes
    }

    pub fn find(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id() == id)
    }

    pub fn contains(&self, id: &NoteId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    fn position(&self, id: &NoteId) -> Option<usize> {
        self.notes.iter().position(|note| note.id() == id)
    }
}

fn ensure_content(content: String) -> StoreResult<String> {
    if content.trim().is_empty() {
        return Err(StoreError::EmptyContent);
    }
    Ok(content)
}
