//! Modal controller.
//!
//! # Responsibility
//! - Hold the current `ModalState` and the markdown/plain-text preference.
//! - Apply one `UserAction` at a time against a `NoteStore`.
//!
//! # Invariants
//! - Snapshots held in `Editing`/`Viewing` are clones; the store stays the
//!   only owner of note records.
//! - A failed submit (blank content) leaves the state untouched so the form
//!   stays open.
//! - Actions that do not apply to the current state are ignored.

use crate::model::note::{Note, NoteId};
use crate::store::note_store::{NoteStore, StoreError, StoreResult};
use log::debug;
use serde::{Deserialize, Serialize};

/// Presentation preference for note bodies. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Content is handed to a markdown renderer.
    #[default]
    Markdown,
    /// Content is shown as plain text.
    PlainText,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Markdown => Self::PlainText,
            Self::PlainText => Self::Markdown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::PlainText => "plain_text",
        }
    }
}

/// Which surface is active, with the note snapshot it works on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Closed,
    Adding,
    Editing(Note),
    Viewing(Note),
}

/// Payload-free discriminant of `ModalState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalKind {
    Closed,
    Adding,
    Editing,
    Viewing,
}

impl ModalKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Adding => "adding",
            Self::Editing => "editing",
            Self::Viewing => "viewing",
        }
    }
}

impl ModalState {
    pub fn kind(&self) -> ModalKind {
        match self {
            Self::Closed => ModalKind::Closed,
            Self::Adding => ModalKind::Adding,
            Self::Editing(_) => ModalKind::Editing,
            Self::Viewing(_) => ModalKind::Viewing,
        }
    }

    /// Snapshot of the note being edited or viewed.
    pub fn note(&self) -> Option<&Note> {
        match self {
            Self::Editing(note) | Self::Viewing(note) => Some(note),
            Self::Closed | Self::Adding => None,
        }
    }
}

/// Discrete user interactions with the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    TapAdd,
    TapCard(NoteId),
    TapEdit,
    Submit(String),
    TapDelete,
    /// Cancel, close, or click outside the active surface.
    Dismiss,
    ToggleViewMode,
}

impl UserAction {
    fn name(&self) -> &'static str {
        match self {
            Self::TapAdd => "tap_add",
            Self::TapCard(_) => "tap_card",
            Self::TapEdit => "tap_edit",
            Self::Submit(_) => "submit",
            Self::TapDelete => "tap_delete",
            Self::Dismiss => "dismiss",
            Self::ToggleViewMode => "toggle_view_mode",
        }
    }
}

/// Store mutation caused by an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    Added(Note),
    Edited(Note),
    Deleted(Note),
}

/// How the controller handled an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Transition performed as requested.
    Applied,
    /// Action does not apply to the current state.
    Ignored,
    /// Referenced note no longer exists; modal closed.
    Degraded,
}

/// Result of applying one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub disposition: Disposition,
    pub change: Option<StoreChange>,
}

impl Outcome {
    fn applied(change: Option<StoreChange>) -> Self {
        Self {
            disposition: Disposition::Applied,
            change,
        }
    }

    fn ignored() -> Self {
        Self {
            disposition: Disposition::Ignored,
            change: None,
        }
    }

    fn degraded() -> Self {
        Self {
            disposition: Disposition::Degraded,
            change: None,
        }
    }

    /// Returns whether the store needs to be synced.
    pub fn store_changed(&self) -> bool {
        self.change.is_some()
    }
}

/// Finite state machine gating the add/edit/view surfaces.
#[derive(Debug, Clone, Default)]
pub struct ModalController {
    state: ModalState,
    view_mode: ViewMode,
}

impl ModalController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_view_mode(view_mode: ViewMode) -> Self {
        Self {
            state: ModalState::Closed,
            view_mode,
        }
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Content the editable field must be pre-filled with.
    ///
    /// `Some("")` while adding, the snapshot content while editing, `None`
    /// when no form is shown.
    pub fn form_prefill(&self) -> Option<&str> {
        match &self.state {
            ModalState::Adding => Some(""),
            ModalState::Editing(note) => Some(note.content()),
            ModalState::Closed | ModalState::Viewing(_) => None,
        }
    }

    /// Applies one user action, mutating `store` when the transition asks
    /// for it.
    ///
    /// # Errors
    /// - `StoreError::EmptyContent` on a blank submit; state is unchanged.
    pub fn apply(&mut self, action: UserAction, store: &mut NoteStore) -> StoreResult<Outcome> {
        let from = self.state.kind();
        let action_name = action.name();
        let outcome = self.transition(action, store)?;
        debug!(
            "event=modal_transition module=controller action={} from={} to={} disposition={:?}",
            action_name,
            from.as_str(),
            self.state.kind().as_str(),
            outcome.disposition
        );
        Ok(outcome)
    }

    /// Closes the modal if its snapshot no longer exists in `store`.
    ///
    /// Returns `true` when the state was degraded.
    pub fn revalidate(&mut self, store: &NoteStore) -> bool {
        let stale = self
            .state
            .note()
            .is_some_and(|note| !store.contains(note.id()));
        if stale {
            debug!("event=modal_revalidate module=controller status=degraded");
            self.state = ModalState::Closed;
        }
        stale
    }

    fn transition(&mut self, action: UserAction, store: &mut NoteStore) -> StoreResult<Outcome> {
        match action {
            UserAction::ToggleViewMode => {
                self.view_mode = self.view_mode.toggled();
                Ok(Outcome::applied(None))
            }
            UserAction::TapAdd => {
                if self.state != ModalState::Closed {
                    return Ok(Outcome::ignored());
                }
                self.state = ModalState::Adding;
                Ok(Outcome::applied(None))
            }
            UserAction::TapCard(id) => {
                if !matches!(self.state, ModalState::Closed | ModalState::Viewing(_)) {
                    return Ok(Outcome::ignored());
                }
                Ok(self.open_snapshot(store, &id, ModalState::Viewing))
            }
            UserAction::TapEdit => {
                let ModalState::Viewing(note) = &self.state else {
                    return Ok(Outcome::ignored());
                };
                let id = note.id().clone();
                Ok(self.open_snapshot(store, &id, ModalState::Editing))
            }
            UserAction::Submit(content) => self.submit(content, store),
            UserAction::TapDelete => {
                let ModalState::Viewing(note) = &self.state else {
                    return Ok(Outcome::ignored());
                };
                let removed = store.delete(note.id());
                self.state = ModalState::Closed;
                Ok(match removed {
                    Some(note) => Outcome::applied(Some(StoreChange::Deleted(note))),
                    None => Outcome::degraded(),
                })
            }
            UserAction::Dismiss => {
                if self.state == ModalState::Closed {
                    return Ok(Outcome::ignored());
                }
                self.state = ModalState::Closed;
                Ok(Outcome::applied(None))
            }
        }
    }

    fn submit(&mut self, content: String, store: &mut NoteStore) -> StoreResult<Outcome> {
        let change = match &self.state {
            ModalState::Adding => StoreChange::Added(store.add(content)?),
            ModalState::Editing(note) => match store.edit(note.id(), content) {
                Ok(edited) => StoreChange::Edited(edited),
                Err(StoreError::NotFound(_)) => {
                    self.state = ModalState::Closed;
                    return Ok(Outcome::degraded());
                }
                Err(err) => return Err(err),
            },
            ModalState::Closed | ModalState::Viewing(_) => return Ok(Outcome::ignored()),
        };
        self.state = ModalState::Closed;
        Ok(Outcome::applied(Some(change)))
    }

    fn open_snapshot(
        &mut self,
        store: &NoteStore,
        id: &NoteId,
        into: fn(Note) -> ModalState,
    ) -> Outcome {
        match store.find(id) {
            Some(note) => {
                self.state = into(note.clone());
                Outcome::applied(None)
            }
            None => {
                self.state = ModalState::Closed;
                Outcome::degraded()
            }
        }
    }
}
