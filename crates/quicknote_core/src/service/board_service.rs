//! Note board use-case service.
//!
//! # Responsibility
//! - Own one store, one controller and one persistence adapter.
//! - Run the action flow: controller transition, store mutation, slot sync.
//! - Apply the startup recovery policy for unreadable slots.
//!
//! # Invariants
//! - The slot is rewritten after every action that changed the store.
//! - A failed save keeps the in-memory mutation; the next successful save
//!   rewrites the whole collection.
//! - Corrupt slots start an empty board; payloads are backed up first.

use crate::config::BoardConfig;
use crate::controller::modal::{ModalController, ModalState, Outcome, UserAction, ViewMode};
use crate::model::note::{Note, NoteId};
use crate::persistence::note_slot::{PersistenceAdapter, PersistenceError};
use crate::service::card::{project_cards, NoteCard};
use crate::storage::KeyValueStorage;
use crate::store::note_store::{NoteStore, StoreError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type BoardResult<T> = Result<T, BoardError>;

/// Errors surfaced by board use-cases.
#[derive(Debug)]
pub enum BoardError {
    /// Action was rejected by the store (e.g. blank content).
    Store(StoreError),
    /// Slot could not be read or written.
    Persistence(PersistenceError),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<StoreError> for BoardError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<PersistenceError> for BoardError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

/// How the collection was obtained when the board was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadReport {
    /// Slot decoded cleanly.
    Loaded { count: usize },
    /// Slot was absent or blank.
    StartedEmpty,
    /// Slot was unreadable; the board started empty.
    Recovered {
        reason: String,
        backup_key: Option<String>,
    },
}

/// Note board facade driving a presentation layer.
pub struct NoteBoard<S: KeyValueStorage> {
    store: NoteStore,
    controller: ModalController,
    adapter: PersistenceAdapter<S>,
    config: BoardConfig,
    load_report: LoadReport,
}

impl<S: KeyValueStorage> NoteBoard<S> {
    /// Opens a board over `storage` with default configuration.
    pub fn open(storage: S) -> BoardResult<Self> {
        Self::open_with_config(storage, BoardConfig::default())
    }

    /// Opens a board, loading the configured slot.
    ///
    /// # Errors
    /// - `Persistence(Storage(..))` when the storage facility is unavailable.
    ///   Corrupt slot content is not an error; see `load_report()`.
    pub fn open_with_config(storage: S, config: BoardConfig) -> BoardResult<Self> {
        let mut adapter = PersistenceAdapter::with_key(storage, config.storage_key.clone());
        let (notes, load_report) = load_or_recover(&mut adapter, &config)?;
        info!(
            "event=board_open module=service status=ok key={} count={}",
            adapter.key(),
            notes.len()
        );
        Ok(Self {
            store: NoteStore::from_notes(notes),
            controller: ModalController::with_view_mode(config.initial_view_mode),
            adapter,
            config,
            load_report,
        })
    }

    /// Applies one user action and syncs the slot when the store changed.
    pub fn dispatch(&mut self, action: UserAction) -> BoardResult<Outcome> {
        let outcome = self.controller.apply(action, &mut self.store)?;
        if outcome.store_changed() {
            self.sync()?;
        }
        Ok(outcome)
    }

    pub fn tap_add(&mut self) -> BoardResult<Outcome> {
        self.dispatch(UserAction::TapAdd)
    }

    pub fn tap_card(&mut self, id: impl Into<NoteId>) -> BoardResult<Outcome> {
        self.dispatch(UserAction::TapCard(id.into()))
    }

    pub fn tap_edit(&mut self) -> BoardResult<Outcome> {
        self.dispatch(UserAction::TapEdit)
    }

    pub fn submit(&mut self, content: impl Into<String>) -> BoardResult<Outcome> {
        self.dispatch(UserAction::Submit(content.into()))
    }

    pub fn tap_delete(&mut self) -> BoardResult<Outcome> {
        self.dispatch(UserAction::TapDelete)
    }

    pub fn dismiss(&mut self) -> BoardResult<Outcome> {
        self.dispatch(UserAction::Dismiss)
    }

    pub fn toggle_view_mode(&mut self) -> BoardResult<Outcome> {
        self.dispatch(UserAction::ToggleViewMode)
    }

    /// Re-reads the slot, replacing the in-memory collection.
    ///
    /// Picks up writes made by other boards over the same storage. The modal
    /// closes if its note disappeared.
    pub fn reload(&mut self) -> BoardResult<&LoadReport> {
        let (notes, report) = load_or_recover(&mut self.adapter, &self.config)?;
        self.store = NoteStore::from_notes(notes);
        self.controller.revalidate(&self.store);
        self.load_report = report;
        Ok(&self.load_report)
    }

    pub fn notes(&self) -> &[Note] {
        self.store.list()
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    pub fn modal(&self) -> &ModalState {
        self.controller.state()
    }

    pub fn form_prefill(&self) -> Option<&str> {
        self.controller.form_prefill()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.controller.view_mode()
    }

    pub fn cards(&self) -> Vec<NoteCard> {
        project_cards(self.store.list(), self.controller.view_mode())
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        self.adapter.storage()
    }

    pub fn into_storage(self) -> S {
        self.adapter.into_storage()
    }

    fn sync(&mut self) -> BoardResult<()> {
        self.adapter.save(self.store.list()).map_err(|err| {
            error!(
                "event=board_sync module=service status=error key={} count={} error={}",
                self.adapter.key(),
                self.store.len(),
                err
            );
            BoardError::Persistence(err)
        })
    }
}

fn load_or_recover<S: KeyValueStorage>(
    adapter: &mut PersistenceAdapter<S>,
    config: &BoardConfig,
) -> BoardResult<(Vec<Note>, LoadReport)> {
    match adapter.load() {
        Ok(notes) => {
            let count = notes.len();
            Ok((notes, LoadReport::Loaded { count }))
        }
        Err(PersistenceError::CorruptState(reason)) if !reason.has_payload() => {
            Ok((Vec::new(), LoadReport::StartedEmpty))
        }
        Err(PersistenceError::CorruptState(reason)) => {
            let backup_key = adapter.backup_raw(&config.corrupt_backup_suffix)?;
            warn!(
                "event=board_recover module=service status=started_empty key={} backup_key={}",
                adapter.key(),
                backup_key.as_deref().unwrap_or("none")
            );
            Ok((
                Vec::new(),
                LoadReport::Recovered {
                    reason: reason.to_string(),
                    backup_key,
                },
            ))
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::{LoadReport, NoteBoard};
    use crate::controller::modal::{Disposition, ModalKind};
    use crate::storage::{KeyValueStorage, MemoryStorage};

    #[test]
    fn open_on_fresh_storage_starts_empty() {
        let board = NoteBoard::open(MemoryStorage::new()).unwrap();
        assert!(board.notes().is_empty());
        assert_eq!(board.load_report(), &LoadReport::StartedEmpty);
        assert_eq!(board.modal().kind(), ModalKind::Closed);
    }

    #[test]
    fn open_on_malformed_slot_backs_up_and_starts_empty() {
        let storage = MemoryStorage::new().with_item("notes", "[{broken");
        let board = NoteBoard::open(storage).unwrap();
        assert!(board.notes().is_empty());
        match board.load_report() {
            LoadReport::Recovered { backup_key, .. } => {
                assert_eq!(backup_key.as_deref(), Some("notes.corrupt"));
            }
            other => panic!("unexpected report: {other:?}"),
        }
        assert_eq!(
            board
                .storage()
                .get_item("notes.corrupt")
                .unwrap()
                .as_deref(),
            Some("[{broken")
        );
    }

    #[test]
    fn viewing_only_actions_do_not_touch_the_slot() {
        let mut board = NoteBoard::open(MemoryStorage::new()).unwrap();
        board.tap_add().unwrap();
        board.dismiss().unwrap();
        assert_eq!(board.storage().get_item("notes").unwrap(), None);

        let outcome = board.tap_card("missing").unwrap();
        assert_eq!(outcome.disposition, Disposition::Degraded);
        assert_eq!(board.storage().get_item("notes").unwrap(), None);
    }
}
