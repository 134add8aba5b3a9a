use notekeep_core::db::open_db_in_memory;
use notekeep_core::{
    Importance, KeyValueStore, Note, NoteDraft, NoteId, NoteRepository, NoteService, NoteStorage,
    SqliteKeyValueStore, StorageError, NOTES_KEY,
};

fn note(id: &str, title: &str, importance: Importance) -> Note {
    Note {
        id: NoteId::new(id),
        title: title.to_string(),
        content: format!("{title} body"),
        date_time: "2024-05-01T09:30:00.000Z".to_string(),
        importance,
    }
}

#[test]
fn load_from_empty_store_returns_empty_collection() {
    let conn = open_db_in_memory().unwrap();
    let storage = NoteStorage::new(SqliteKeyValueStore::try_new(&conn).unwrap());

    assert!(storage.load().unwrap().is_empty());
}

#[test]
fn save_then_load_is_lossless() {
    let conn = open_db_in_memory().unwrap();
    let storage = NoteStorage::new(SqliteKeyValueStore::try_new(&conn).unwrap());
    let notes = vec![
        note("1", "first", Importance::Important),
        note("2", "second", Importance::Low),
        note("3", "third", Importance::parse("Someday")),
    ];

    storage.save(&notes).unwrap();
    assert_eq!(storage.load().unwrap(), notes);
}

#[test]
fn stored_value_is_one_json_array_under_fixed_key() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    let storage = NoteStorage::new(&store);
    storage
        .save(&[note("7", "only", Importance::Normal)])
        .unwrap();

    assert_eq!(store.keys().unwrap(), vec![NOTES_KEY.to_string()]);
    let raw = store.get_item(NOTES_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let first = &value.as_array().unwrap()[0];
    assert_eq!(first["id"], "7");
    assert_eq!(first["dateTime"], "2024-05-01T09:30:00.000Z");
    assert_eq!(first["importance"], "Normal");
}

#[test]
fn corrupted_value_degrades_to_empty_collection() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    store.set_item(NOTES_KEY, "{not json").unwrap();

    let storage = NoteStorage::new(&store);
    assert!(storage.load().unwrap().is_empty());
}

#[test]
fn records_written_by_other_producers_are_accepted() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    store
        .set_item(
            NOTES_KEY,
            r#"[{"id":"1717171717171","title":"Old","content":"","dateTime":"2024-05-31T16:08:37.171Z","importance":"urgent"}]"#,
        )
        .unwrap();

    let notes = NoteStorage::new(&store).load().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].importance, Importance::parse("urgent"));
    assert!(notes[0].timestamp().is_some());
}

#[test]
fn null_fields_in_one_record_keep_the_rest_of_the_collection() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    store
        .set_item(
            NOTES_KEY,
            r#"[{"id":"1","title":"keep me","content":"body","dateTime":"2024-05-01T09:30:00.000Z","importance":"Low"},{"id":"2","title":"odd","content":null,"dateTime":"2024-05-01T09:31:00.000Z","importance":null}]"#,
        )
        .unwrap();

    let notes = NoteStorage::new(&store).load().unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[1].content, "");
    assert_eq!(notes[1].importance, Importance::Normal);

    let mut service = NoteService::new(NoteRepository::try_new(&store).unwrap());
    service
        .save_note(&NoteDraft::new("new", "", Importance::Normal))
        .unwrap();

    let titles = service
        .list_notes()
        .unwrap()
        .into_iter()
        .map(|note| note.title)
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["keep me", "odd", "new"]);
}

#[test]
fn non_text_importance_is_kept_as_unrecognized_label() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    store
        .set_item(
            NOTES_KEY,
            r#"[{"id":42,"title":"numeric","content":"","dateTime":"2024-05-01T09:30:00.000Z","importance":3}]"#,
        )
        .unwrap();

    let storage = NoteStorage::new(&store);
    let notes = storage.load().unwrap();
    assert_eq!(notes[0].id, NoteId::new("42"));
    assert_eq!(notes[0].importance, Importance::parse("3"));

    storage.save(&notes).unwrap();
    assert_eq!(storage.load().unwrap(), notes);
}

#[test]
fn write_failure_is_surfaced() {
    let conn = open_db_in_memory().unwrap();
    let storage = NoteStorage::new(SqliteKeyValueStore::try_new(&conn).unwrap());
    conn.execute_batch("PRAGMA query_only = ON;").unwrap();

    let err = storage
        .save(&[note("1", "blocked", Importance::Normal)])
        .unwrap_err();
    assert!(matches!(err, StorageError::Db(_)));
}

#[test]
fn store_read_failure_is_not_masked_as_empty() {
    let conn = open_db_in_memory().unwrap();
    let storage = NoteStorage::new(SqliteKeyValueStore::try_new(&conn).unwrap());
    conn.execute_batch("DROP TABLE kv_store;").unwrap();

    assert!(storage.load().is_err());
}
