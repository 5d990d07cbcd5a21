use quicknote_core::storage::StorageResult;
use quicknote_core::{
    BoardConfig, BoardError, Disposition, KeyValueStorage, LoadReport, MemoryStorage, ModalKind,
    ModalState, NoteBoard, PersistenceAdapter, PersistenceError, SqliteStorage, StoreChange,
    StoreError, ViewMode,
};

#[test]
fn add_flow_creates_note_and_persists_it() {
    let mut board = NoteBoard::open(MemoryStorage::new()).unwrap();

    board.tap_add().unwrap();
    assert_eq!(board.form_prefill(), Some(""));
    let outcome = board.submit("hello").unwrap();

    assert!(matches!(outcome.change, Some(StoreChange::Added(_))));
    assert_eq!(board.modal(), &ModalState::Closed);
    assert_eq!(board.notes().len(), 1);
    assert_eq!(board.notes()[0].content(), "hello");

    let persisted = PersistenceAdapter::new(board.into_storage()).load().unwrap();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].content(), "hello");
}

#[test]
fn view_edit_submit_moves_note_to_front() {
    let mut board = NoteBoard::open(MemoryStorage::new()).unwrap();
    board.tap_add().unwrap();
    board.submit("A").unwrap();
    board.tap_add().unwrap();
    board.submit("B").unwrap();
    let a_id = board.notes()[1].id().clone();

    board.tap_card(a_id.clone()).unwrap();
    assert_eq!(board.modal().kind(), ModalKind::Viewing);
    board.tap_edit().unwrap();
    assert_eq!(board.form_prefill(), Some("A"));
    board.submit("new text").unwrap();

    assert_eq!(board.modal(), &ModalState::Closed);
    assert_eq!(board.notes()[0].id(), &a_id);
    assert_eq!(board.notes()[0].content(), "new text");
    assert_eq!(board.notes()[1].content(), "B");
    assert!(board.notes()[0].is_edited());
}

#[test]
fn delete_from_view_closes_modal_and_persists() {
    let mut board = NoteBoard::open(MemoryStorage::new()).unwrap();
    board.tap_add().unwrap();
    board.submit("doomed").unwrap();
    let id = board.notes()[0].id().clone();

    board.tap_card(id).unwrap();
    let outcome = board.tap_delete().unwrap();

    assert!(matches!(outcome.change, Some(StoreChange::Deleted(_))));
    assert_eq!(board.modal(), &ModalState::Closed);
    assert!(board.notes().is_empty());
    let persisted = PersistenceAdapter::new(board.into_storage()).load().unwrap();
    assert!(persisted.is_empty());
}

#[test]
fn tapping_another_card_while_viewing_switches_snapshot() {
    let mut board = NoteBoard::open(MemoryStorage::new()).unwrap();
    for content in ["one", "two"] {
        board.tap_add().unwrap();
        board.submit(content).unwrap();
    }
    let two = board.notes()[0].clone();
    let one = board.notes()[1].clone();

    board.tap_card(two.id().clone()).unwrap();
    board.tap_card(one.id().clone()).unwrap();
    assert_eq!(board.modal(), &ModalState::Viewing(one));
}

#[test]
fn dismiss_discards_unsaved_edit() {
    let mut board = NoteBoard::open(MemoryStorage::new()).unwrap();
    board.tap_add().unwrap();
    board.submit("keep me").unwrap();
    let id = board.notes()[0].id().clone();

    board.tap_card(id).unwrap();
    board.tap_edit().unwrap();
    board.dismiss().unwrap();

    assert_eq!(board.modal(), &ModalState::Closed);
    assert_eq!(board.notes()[0].content(), "keep me");
    assert!(!board.notes()[0].is_edited());
}

#[test]
fn blank_submit_is_rejected_and_form_stays_open() {
    let mut board = NoteBoard::open(MemoryStorage::new()).unwrap();
    board.tap_add().unwrap();

    let err = board.submit("   ").unwrap_err();
    assert!(matches!(err, BoardError::Store(StoreError::EmptyContent)));
    assert_eq!(board.modal().kind(), ModalKind::Adding);
    assert!(board.notes().is_empty());
}

#[test]
fn stale_references_from_another_board_degrade_to_closed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.db");

    let mut first = NoteBoard::open(SqliteStorage::open(&path).unwrap()).unwrap();
    first.tap_add().unwrap();
    first.submit("shared").unwrap();
    let id = first.notes()[0].id().clone();

    let mut second = NoteBoard::open(SqliteStorage::open(&path).unwrap()).unwrap();
    assert_eq!(second.load_report(), &LoadReport::Loaded { count: 1 });
    second.tap_card(id.clone()).unwrap();
    second.tap_delete().unwrap();

    // `first` still holds the note in memory; editing it after the other
    // board deleted it works locally, the reload then drops it again.
    first.tap_card(id.clone()).unwrap();
    first.tap_edit().unwrap();
    first.reload().unwrap();
    assert_eq!(first.modal(), &ModalState::Closed);
    assert!(first.notes().is_empty());

    // A card tap for an id that vanished closes instead of failing.
    let outcome = first.tap_card(id).unwrap();
    assert_eq!(outcome.disposition, Disposition::Degraded);
    assert_eq!(first.modal(), &ModalState::Closed);
}

#[test]
fn reload_while_editing_removed_note_closes_form() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.db");

    let mut first = NoteBoard::open(SqliteStorage::open(&path).unwrap()).unwrap();
    first.tap_add().unwrap();
    first.submit("editing").unwrap();
    let id = first.notes()[0].id().clone();
    first.tap_card(id.clone()).unwrap();
    first.tap_edit().unwrap();

    let mut second = NoteBoard::open(SqliteStorage::open(&path).unwrap()).unwrap();
    second.tap_card(id).unwrap();
    second.tap_delete().unwrap();

    // Reload while editing: the snapshot is gone, so the modal closes.
    first.reload().unwrap();
    assert_eq!(first.modal(), &ModalState::Closed);
    let outcome = first.submit("too late").unwrap();
    assert_eq!(outcome.disposition, Disposition::Ignored);
    assert!(first.notes().is_empty());
}

#[test]
fn last_writer_wins_across_boards() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.db");

    let mut first = NoteBoard::open(SqliteStorage::open(&path).unwrap()).unwrap();
    let mut second = NoteBoard::open(SqliteStorage::open(&path).unwrap()).unwrap();

    first.tap_add().unwrap();
    first.submit("from first").unwrap();
    second.tap_add().unwrap();
    second.submit("from second").unwrap();

    let reopened = NoteBoard::open(SqliteStorage::open(&path).unwrap()).unwrap();
    assert_eq!(reopened.notes().len(), 1);
    assert_eq!(reopened.notes()[0].content(), "from second");
}

#[test]
fn view_mode_toggle_changes_card_excerpt_only() {
    let mut board = NoteBoard::open(MemoryStorage::new()).unwrap();
    board.tap_add().unwrap();
    board.submit("## Heading\n**bold**").unwrap();

    assert_eq!(board.view_mode(), ViewMode::Markdown);
    assert_eq!(board.cards()[0].excerpt, "## Heading\n**bold**");

    let outcome = board.toggle_view_mode().unwrap();
    assert!(!outcome.store_changed());
    assert_eq!(board.view_mode(), ViewMode::PlainText);
    assert_eq!(board.cards()[0].excerpt, "Heading bold");
}

#[test]
fn custom_config_uses_its_slot_and_backup_key() {
    let config = BoardConfig {
        storage_key: "jot".to_string(),
        corrupt_backup_suffix: "bad".to_string(),
        initial_view_mode: ViewMode::PlainText,
    };
    let storage = MemoryStorage::new().with_item("jot", "42");
    let mut board = NoteBoard::open_with_config(storage, config).unwrap();

    assert_eq!(board.view_mode(), ViewMode::PlainText);
    assert!(matches!(
        board.load_report(),
        LoadReport::Recovered { backup_key: Some(key), .. } if key == "jot.bad"
    ));

    board.tap_add().unwrap();
    board.submit("fresh").unwrap();
    let storage = board.into_storage();
    assert_eq!(storage.get_item("jot.bad").unwrap().as_deref(), Some("42"));
    assert!(storage.get_item("jot").unwrap().unwrap().contains("fresh"));
}

/// Storage whose writes can be switched off.
#[derive(Default)]
struct FlakyStorage {
    inner: MemoryStorage,
    fail_writes: bool,
}

impl KeyValueStorage for FlakyStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        if self.fail_writes {
            return Err(rusqlite::Error::InvalidQuery.into());
        }
        self.inner.set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        self.inner.remove_item(key)
    }
}

#[test]
fn failed_save_keeps_in_memory_mutation() {
    let storage = FlakyStorage {
        fail_writes: true,
        ..FlakyStorage::default()
    };
    let mut board = NoteBoard::open(storage).unwrap();
    board.tap_add().unwrap();

    let err = board.submit("unsynced").unwrap_err();
    assert!(matches!(
        err,
        BoardError::Persistence(PersistenceError::Storage(_))
    ));
    assert_eq!(board.modal(), &ModalState::Closed);
    assert_eq!(board.notes().len(), 1);
    assert_eq!(board.storage().get_item("notes").unwrap(), None);
}

#[test]
fn second_corrupt_startup_keeps_first_backup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.db");
    let mut storage = SqliteStorage::open(&path).unwrap();
    storage.set_item("notes", "[{first").unwrap();
    drop(storage);

    let board = NoteBoard::open(SqliteStorage::open(&path).unwrap()).unwrap();
    assert!(matches!(
        board.load_report(),
        LoadReport::Recovered { backup_key: Some(key), .. } if key == "notes.corrupt"
    ));
    let mut storage = board.into_storage();
    storage.set_item("notes", "[{second").unwrap();
    drop(storage);

    let board = NoteBoard::open(SqliteStorage::open(&path).unwrap()).unwrap();
    assert!(matches!(
        board.load_report(),
        LoadReport::Recovered { backup_key: Some(key), .. } if key == "notes.corrupt.1"
    ));
    let storage = board.into_storage();
    assert_eq!(
        storage.get_item("notes.corrupt").unwrap().as_deref(),
        Some("[{first")
    );
    assert_eq!(
        storage.get_item("notes.corrupt.1").unwrap().as_deref(),
        Some("[{second")
    );
}

#[test]
fn slot_with_duplicate_ids_never_reaches_the_store() {
    let payload = r#"[
        {"id":"twin","content":"a","createdAt":"2026-01-01T00:00:00.000Z","updatedAt":"2026-01-01T00:00:00.000Z"},
        {"id":"twin","content":"b","createdAt":"2026-01-01T00:00:00.000Z","updatedAt":"2026-01-01T00:00:00.000Z"}
    ]"#;
    let board = NoteBoard::open(MemoryStorage::new().with_item("notes", payload)).unwrap();

    assert!(board.notes().is_empty());
    assert!(matches!(board.load_report(), LoadReport::Recovered { .. }));
}

#[test]
fn stored_ids_are_matched_exactly() {
    let payload = r#"[
        {"id":" padded ","content":"kept as is","createdAt":"2026-01-01T00:00:00.000Z","updatedAt":"2026-01-01T00:00:00.000Z"}
    ]"#;
    let mut board = NoteBoard::open(MemoryStorage::new().with_item("notes", payload)).unwrap();

    let outcome = board.tap_card("padded").unwrap();
    assert_eq!(outcome.disposition, Disposition::Degraded);

    board.tap_card(" padded ").unwrap();
    assert_eq!(board.modal().kind(), ModalKind::Viewing);
    assert_eq!(board.modal().note().unwrap().content(), "kept as is");
}
