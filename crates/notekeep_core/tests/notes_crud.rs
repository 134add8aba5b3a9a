use chrono::{Duration, Utc};
use notekeep_core::db::open_db_in_memory;
use notekeep_core::{
    Importance, NoteDraft, NoteId, NoteRepository, NoteService, NoteServiceError,
    NoteValidationError, RepoError, SqliteKeyValueStore,
};
use rusqlite::Connection;
use std::collections::BTreeMap;

fn service(conn: &Connection) -> NoteService<SqliteKeyValueStore<'_>> {
    let store = SqliteKeyValueStore::try_new(conn).unwrap();
    NoteService::new(NoteRepository::try_new(store).unwrap())
}

#[test]
fn listing_empty_store_returns_empty_sequence() {
    let conn = open_db_in_memory().unwrap();
    let mut service = service(&conn);

    assert!(service.list_notes().unwrap().is_empty());
}

#[test]
fn create_stamps_id_and_current_time() {
    let conn = open_db_in_memory().unwrap();
    let mut service = service(&conn);

    let before = Utc::now() - Duration::seconds(1);
    let created = service
        .save_note(&NoteDraft::new("Groceries", "Milk, eggs", Importance::Normal))
        .unwrap();
    let after = Utc::now() + Duration::seconds(1);

    let listed = service.list_notes().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], created);
    assert!(!created.id.as_str().is_empty());
    let stamped = created.timestamp().expect("dateTime should be ISO-8601");
    assert!(stamped >= before && stamped <= after);
}

#[test]
fn editing_importance_keeps_id_and_other_fields() {
    let conn = open_db_in_memory().unwrap();
    let mut service = service(&conn);
    let created = service
        .save_note(&NoteDraft::new("Groceries", "Milk, eggs", Importance::Normal))
        .unwrap();

    let mut draft = NoteDraft::editing(&created);
    draft.importance = Importance::Important;
    let edited = service.save_note(&draft).unwrap();

    assert_eq!(edited.id, created.id);
    assert_eq!(edited.title, created.title);
    assert_eq!(edited.content, created.content);
    assert_eq!(edited.importance, Importance::Important);
    assert!(edited.timestamp().unwrap() >= created.timestamp().unwrap());

    let listed = service.list_notes().unwrap();
    assert_eq!(listed, vec![edited]);
}

#[test]
fn blank_title_is_rejected_before_storage_is_touched() {
    let conn = open_db_in_memory().unwrap();
    let mut service = service(&conn);
    conn.execute_batch("PRAGMA query_only = ON;").unwrap();

    let err = service
        .save_note(&NoteDraft::new("  \t", "body", Importance::Low))
        .unwrap_err();
    assert!(matches!(
        err,
        NoteServiceError::Validation(NoteValidationError::EmptyTitle)
    ));
    assert_eq!(err.user_message(), "Note title cannot be empty.");
}

#[test]
fn deleting_missing_id_reports_not_found_and_leaves_collection() {
    let conn = open_db_in_memory().unwrap();
    let mut service = service(&conn);
    let kept = service
        .save_note(&NoteDraft::new("keep", "", Importance::Low))
        .unwrap();

    let err = service
        .delete_note(&NoteId::new("does-not-exist"))
        .unwrap_err();
    assert!(matches!(err, NoteServiceError::NoteNotFound(ref id) if id.as_str() == "does-not-exist"));
    assert_eq!(service.list_notes().unwrap(), vec![kept]);
}

#[test]
fn deleting_twice_equals_deleting_once() {
    let conn = open_db_in_memory().unwrap();
    let mut service = service(&conn);
    let first = service
        .save_note(&NoteDraft::new("first", "", Importance::Normal))
        .unwrap();
    let second = service
        .save_note(&NoteDraft::new("second", "", Importance::Normal))
        .unwrap();

    service.delete_note(&first.id).unwrap();
    let after_once = service.list_notes().unwrap();
    let err = service.delete_note(&first.id).unwrap_err();
    assert!(matches!(err, NoteServiceError::NoteNotFound(_)));
    assert_eq!(service.list_notes().unwrap(), after_once);
    assert_eq!(after_once, vec![second]);
}

#[test]
fn updating_note_deleted_elsewhere_does_not_reinsert_it() {
    let conn = open_db_in_memory().unwrap();
    let mut editor = service(&conn);
    let created = editor
        .save_note(&NoteDraft::new("shared", "", Importance::Normal))
        .unwrap();

    let mut other = service(&conn);
    other.delete_note(&created.id).unwrap();

    let err = editor.save_note(&NoteDraft::editing(&created)).unwrap_err();
    assert!(matches!(err, NoteServiceError::NoteNotFound(_)));
    assert_eq!(err.user_message(), "The note no longer exists.");
    assert!(editor.list_notes().unwrap().is_empty());
}

#[test]
fn failed_write_is_surfaced_and_cache_keeps_persisted_state() {
    let conn = open_db_in_memory().unwrap();
    let mut service = service(&conn);
    let created = service
        .save_note(&NoteDraft::new("persisted", "", Importance::Normal))
        .unwrap();

    conn.execute_batch("PRAGMA query_only = ON;").unwrap();
    let err = service
        .save_note(&NoteDraft::new("lost", "", Importance::Normal))
        .unwrap_err();
    assert!(matches!(err, NoteServiceError::SaveFailed(_)));
    assert_eq!(service.repository().cached(), &[created.clone()]);

    let err = service.delete_note(&created.id).unwrap_err();
    assert!(matches!(err, NoteServiceError::DeleteFailed(_)));
    assert_eq!(err.user_message(), "Unable to delete the note. Please try again.");

    conn.execute_batch("PRAGMA query_only = OFF;").unwrap();
    assert_eq!(service.list_notes().unwrap(), vec![created]);
}

#[test]
fn get_note_reads_fresh_storage() {
    let conn = open_db_in_memory().unwrap();
    let mut service = service(&conn);
    let created = service
        .save_note(&NoteDraft::new("find me", "x", Importance::Important))
        .unwrap();

    assert_eq!(service.get_note(&created.id).unwrap(), created);
    assert!(matches!(
        service.get_note(&NoteId::new("missing")),
        Err(NoteServiceError::NoteNotFound(_))
    ));
}

#[test]
fn replaying_operations_yields_implied_collection() {
    let conn = open_db_in_memory().unwrap();
    let mut service = service(&conn);
    let mut expected = BTreeMap::new();

    for idx in 0..6 {
        let note = service
            .save_note(&NoteDraft::new(format!("note {idx}"), "", Importance::Normal))
            .unwrap();
        expected.insert(note.id.clone(), note);
    }
    let ids = expected.keys().cloned().collect::<Vec<_>>();

    for id in ids.iter().step_by(2) {
        let mut draft = NoteDraft::editing(&expected[id]);
        draft.content = "edited".to_string();
        draft.importance = Importance::Low;
        let edited = service.save_note(&draft).unwrap();
        expected.insert(id.clone(), edited);
    }
    for id in ids.iter().skip(1).step_by(3) {
        service.delete_note(id).unwrap();
        expected.remove(id);
    }

    let stored = service
        .list_notes()
        .unwrap()
        .into_iter()
        .map(|note| (note.id.clone(), note))
        .collect::<BTreeMap<_, _>>();
    assert_eq!(stored, expected);
}

#[test]
fn repository_reload_and_flush_round_trip_cache() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    let mut repo = NoteRepository::new(&store);
    assert!(repo.cached().is_empty());

    let created = repo
        .create(&NoteDraft::new("cached", "", Importance::Normal))
        .unwrap();
    assert_eq!(repo.cached(), &[created.clone()]);

    let mut fresh = NoteRepository::new(&store);
    assert_eq!(fresh.reload().unwrap(), &[created.clone()]);
    fresh.flush().unwrap();
    assert_eq!(repo.list().unwrap(), vec![created.clone()]);

    let err = repo
        .update(&NoteId::new("ghost"), &NoteDraft::editing(&created))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}
