//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose board actions to Dart via FRB as sync functions.
//! - Keep one board session per process so modal state survives between
//!   calls.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every board call returns a full `BoardResponse` snapshot.
//! - The database path is fixed once the board has been opened.

use log::warn;
use quicknote_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    BoardError, Disposition, NoteBoard, NoteCard, Outcome, SqliteStorage, StoreError,
};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};

const BOARD_DB_FILE_NAME: &str = "quicknote_board.sqlite3";
static BOARD_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static BOARD: Mutex<Option<NoteBoard<SqliteStorage>>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Sets the SQLite file backing the board.
///
/// # FFI contract
/// - Must run before the first board call; later calls with the same path
///   succeed, with a different path they fail.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_board_db_path(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "db_path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = BOARD_DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "board db path already set to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// Card item for list rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardCardItem {
    /// Stable note ID.
    pub note_id: String,
    /// Markdown source or stripped text, depending on view mode.
    pub excerpt: String,
    /// ISO-8601 creation timestamp.
    pub created_at: String,
    /// ISO-8601 last update timestamp.
    pub updated_at: String,
    /// Whether the note was edited after creation.
    pub edited: bool,
}

/// Board snapshot returned by every board call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardResponse {
    /// Whether the action succeeded.
    pub ok: bool,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
    /// Active surface: `closed|adding|editing|viewing`.
    pub modal: String,
    /// Note shown in the modal, if any.
    pub modal_note_id: Option<String>,
    /// Editable field content while adding/editing.
    pub form_prefill: Option<String>,
    /// `markdown|plain_text`.
    pub view_mode: String,
    /// Cards in display order (most recent first).
    pub cards: Vec<BoardCardItem>,
}

impl BoardResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            modal: "closed".to_string(),
            modal_note_id: None,
            form_prefill: None,
            view_mode: "markdown".to_string(),
            cards: Vec::new(),
        }
    }
}

/// Returns the current board state without changing it.
#[flutter_rust_bridge::frb(sync)]
pub fn board_snapshot() -> BoardResponse {
    with_board(|board| Ok(snapshot(board, true, "OK.")))
}

/// Opens the add form.
#[flutter_rust_bridge::frb(sync)]
pub fn board_tap_add() -> BoardResponse {
    run_action("board_tap_add", |board| board.tap_add())
}

/// Opens the view surface for one card.
///
/// `note_id` is matched exactly; an unknown id closes the modal.
#[flutter_rust_bridge::frb(sync)]
pub fn board_tap_card(note_id: String) -> BoardResponse {
    run_action("board_tap_card", |board| board.tap_card(note_id))
}

/// Switches the viewed note into the edit form.
#[flutter_rust_bridge::frb(sync)]
pub fn board_tap_edit() -> BoardResponse {
    run_action("board_tap_edit", |board| board.tap_edit())
}

/// Submits the add/edit form.
///
/// Blank content returns `ok=false` with the form still open.
#[flutter_rust_bridge::frb(sync)]
pub fn board_submit(content: String) -> BoardResponse {
    run_action("board_submit", |board| board.submit(content))
}

/// Deletes the viewed note.
#[flutter_rust_bridge::frb(sync)]
pub fn board_tap_delete() -> BoardResponse {
    run_action("board_tap_delete", |board| board.tap_delete())
}

/// Cancels/closes the active surface.
#[flutter_rust_bridge::frb(sync)]
pub fn board_dismiss() -> BoardResponse {
    run_action("board_dismiss", |board| board.dismiss())
}

/// Flips the markdown/plain-text preference.
#[flutter_rust_bridge::frb(sync)]
pub fn board_toggle_view_mode() -> BoardResponse {
    run_action("board_toggle_view_mode", |board| board.toggle_view_mode())
}

fn run_action(
    name: &'static str,
    action: impl FnOnce(&mut NoteBoard<SqliteStorage>) -> Result<Outcome, BoardError>,
) -> BoardResponse {
    with_board(|board| match action(board) {
        Ok(outcome) => Ok(snapshot(board, true, outcome_message(&outcome))),
        Err(BoardError::Store(StoreError::EmptyContent)) => {
            Ok(snapshot(board, false, "Note content cannot be empty."))
        }
        Err(err) => {
            warn!("event=ffi_action module=ffi status=error action={name} error={err}");
            Ok(snapshot(board, false, format!("{name} failed: {err}")))
        }
    })
}

fn with_board(
    f: impl FnOnce(&mut NoteBoard<SqliteStorage>) -> Result<BoardResponse, String>,
) -> BoardResponse {
    let mut guard = lock_board();
    if guard.is_none() {
        match open_board() {
            Ok(board) => *guard = Some(board),
            Err(err) => return BoardResponse::failure(err),
        }
    }
    match guard.as_mut() {
        Some(board) => f(board).unwrap_or_else(|err| BoardResponse::failure(err)),
        None => BoardResponse::failure("board is not available"),
    }
}

fn lock_board() -> MutexGuard<'static, Option<NoteBoard<SqliteStorage>>> {
    BOARD.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn open_board() -> Result<NoteBoard<SqliteStorage>, String> {
    let db_path = resolve_board_db_path();
    let storage =
        SqliteStorage::open(&db_path).map_err(|err| format!("board DB open failed: {err}"))?;
    NoteBoard::open(storage).map_err(|err| format!("board open failed: {err}"))
}

fn resolve_board_db_path() -> PathBuf {
    BOARD_DB_PATH
        .get_or_init(|| std::env::temp_dir().join(BOARD_DB_FILE_NAME))
        .clone()
}

fn outcome_message(outcome: &Outcome) -> &'static str {
    match outcome.disposition {
        Disposition::Applied => "OK.",
        Disposition::Ignored => "Action does not apply right now.",
        Disposition::Degraded => "Note no longer exists.",
    }
}

fn snapshot(
    board: &NoteBoard<SqliteStorage>,
    ok: bool,
    message: impl Into<String>,
) -> BoardResponse {
    BoardResponse {
        ok,
        message: message.into(),
        modal: board.modal().kind().as_str().to_string(),
        modal_note_id: board.modal().note().map(|note| note.id().to_string()),
        form_prefill: board.form_prefill().map(str::to_string),
        view_mode: board.view_mode().as_str().to_string(),
        cards: board.cards().into_iter().map(to_card_item).collect(),
    }
}

fn to_card_item(card: NoteCard) -> BoardCardItem {
    BoardCardItem {
        note_id: card.id,
        excerpt: card.excerpt,
        created_at: card.created_at,
        updated_at: card.updated_at,
        edited: card.edited,
    }
}
