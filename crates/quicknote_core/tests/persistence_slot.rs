use quicknote_core::{
    CorruptReason, KeyValueStorage, MemoryStorage, NoteStore, NoteValidationError,
    PersistenceAdapter, PersistenceError, SqliteStorage,
};

fn sample_store() -> NoteStore {
    let mut store = NoteStore::new();
    let first = store.add("# groceries\n- milk").unwrap();
    store.add("second").unwrap();
    store.edit(first.id(), "# groceries\n- milk\n- eggs").unwrap();
    store.add("third with \"quotes\" and unicode ✓").unwrap();
    store
}

#[test]
fn save_then_load_preserves_order_and_fields_in_memory() {
    let store = sample_store();
    let mut adapter = PersistenceAdapter::new(MemoryStorage::new());

    adapter.save(store.list()).unwrap();
    assert_eq!(adapter.load().unwrap(), store.list());
}

#[test]
fn save_then_load_preserves_order_and_fields_in_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");
    let store = sample_store();

    let mut adapter = PersistenceAdapter::new(SqliteStorage::open(&path).unwrap());
    adapter.save(store.list()).unwrap();
    drop(adapter);

    let reopened = PersistenceAdapter::new(SqliteStorage::open(&path).unwrap());
    assert_eq!(reopened.load().unwrap(), store.list());
}

#[test]
fn save_replaces_whole_collection() {
    let mut store = sample_store();
    let mut adapter = PersistenceAdapter::new(MemoryStorage::new());
    adapter.save(store.list()).unwrap();

    let victim = store.list()[1].id().clone();
    store.delete(&victim);
    adapter.save(store.list()).unwrap();

    let loaded = adapter.load().unwrap();
    assert_eq!(loaded.len(), 2);
    assert!(loaded.iter().all(|note| note.id() != &victim));
}

#[test]
fn slot_uses_camel_case_json_array_with_iso_timestamps() {
    let mut store = NoteStore::new();
    let note = store.add("hello").unwrap();
    let mut adapter = PersistenceAdapter::new(MemoryStorage::new());
    adapter.save(store.list()).unwrap();

    let raw = adapter.storage().get_item("notes").unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let item = &json.as_array().expect("slot should hold an array")[0];
    assert_eq!(item["id"], note.id().as_str());
    assert_eq!(item["content"], "hello");

    let created = item["createdAt"].as_str().unwrap();
    let updated = item["updatedAt"].as_str().unwrap();
    assert_eq!(created, updated);
    assert!(created.ends_with('Z'));
    // YYYY-MM-DDTHH:MM:SS.sssZ
    assert_eq!(created.len(), 24);
    assert_eq!(item.as_object().unwrap().len(), 4);
}

#[test]
fn loads_payload_written_by_other_clients() {
    let payload = r#"[
        {"id":"1697040000000","content":"legacy","createdAt":"2023-10-11T16:00:00.000Z","updatedAt":"2023-10-12T09:30:15.250Z"}
    ]"#;
    let adapter = PersistenceAdapter::new(MemoryStorage::new().with_item("notes", payload));

    let notes = adapter.load().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].id().as_str(), "1697040000000");
    assert!(notes[0].is_edited());
}

#[test]
fn load_rejects_reversed_timestamps_and_missing_fields() {
    let reversed = r#"[{"id":"x","content":"c","createdAt":"2023-10-12T00:00:00.000Z","updatedAt":"2023-10-11T00:00:00.000Z"}]"#;
    let adapter = PersistenceAdapter::new(MemoryStorage::new().with_item("notes", reversed));
    match adapter.load().unwrap_err() {
        PersistenceError::CorruptState(CorruptReason::InvalidNote(
            NoteValidationError::UpdatedBeforeCreated { id },
        )) => assert_eq!(id.as_str(), "x"),
        other => panic!("unexpected error: {other}"),
    }

    let missing = r#"[{"id":"x","content":"c"}]"#;
    let adapter = PersistenceAdapter::new(MemoryStorage::new().with_item("notes", missing));
    assert!(matches!(
        adapter.load().unwrap_err(),
        PersistenceError::CorruptState(CorruptReason::Malformed(_))
    ));
}

#[test]
fn custom_key_isolates_collections() {
    let mut store = NoteStore::new();
    store.add("scoped").unwrap();
    let mut adapter = PersistenceAdapter::with_key(MemoryStorage::new(), "work-notes");
    adapter.save(store.list()).unwrap();

    let storage = adapter.into_storage();
    assert_eq!(storage.get_item("notes").unwrap(), None);
    assert!(storage.get_item("work-notes").unwrap().is_some());
}
