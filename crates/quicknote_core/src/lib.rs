//! Core domain logic for QuickNote.
//! This crate is the single source of truth for note board invariants.

pub mod config;
pub mod controller;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod service;
pub mod storage;
pub mod store;

pub use config::BoardConfig;
pub use controller::modal::{
    Disposition, ModalController, ModalKind, ModalState, Outcome, StoreChange, UserAction,
    ViewMode,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{Note, NoteId, NoteValidationError};
pub use persistence::note_slot::{
    CorruptReason, PersistenceAdapter, PersistenceError, NOTES_STORAGE_KEY,
};
pub use service::board_service::{BoardError, BoardResult, LoadReport, NoteBoard};
pub use service::card::{plain_text_excerpt, NoteCard};
pub use storage::{KeyValueStorage, MemoryStorage, SqliteStorage, StorageError};
pub use store::note_store::{NoteStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
