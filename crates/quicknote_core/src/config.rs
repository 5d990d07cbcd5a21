//! Board configuration.
//!
//! The core reads no environment variables; hosts build a `BoardConfig`
//! explicitly or take the defaults.

use crate::controller::modal::ViewMode;
use crate::persistence::note_slot::NOTES_STORAGE_KEY;

/// Default suffix for copies of unreadable slot payloads.
pub const CORRUPT_BACKUP_SUFFIX: &str = "corrupt";

/// Settings for opening a `NoteBoard`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// Slot holding the serialized collection.
    pub storage_key: String,
    /// Unreadable payloads are copied to `<storage_key>.<suffix>`.
    pub corrupt_backup_suffix: String,
    /// View preference the controller starts with.
    pub initial_view_mode: ViewMode,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            storage_key: NOTES_STORAGE_KEY.to_string(),
            corrupt_backup_suffix: CORRUPT_BACKUP_SUFFIX.to_string(),
            initial_view_mode: ViewMode::Markdown,
        }
    }
}

impl BoardConfig {
    /// Key the corrupt backup is written to.
    pub fn corrupt_backup_key(&self) -> String {
        format!("{}.{}", self.storage_key, self.corrupt_backup_suffix)
    }
}
