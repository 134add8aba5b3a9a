//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level note functions to Dart via FRB.
//! - Persist and restore the navigator state next to the notes.
//! - Return envelopes carrying user-facing messages instead of errors.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Store calls run one at a time per process, so two read-modify-write
//!   cycles never interleave.
//! - A call returns only after its write finished; the UI navigates after.

use chrono::Local;
use log::{error, warn};
use notekeep_core::db::open_db;
use notekeep_core::view::display::{NoteCard, NoteDetail};
use notekeep_core::view::flow::DashboardView;
use notekeep_core::view::navigation::{NavigationStack, NavigationStore};
use notekeep_core::view::responsive::DashboardLayout;
use notekeep_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Importance, Note, NoteDraft, NoteId, NoteRepository, NoteService, NoteServiceError,
    SqliteKeyValueStore,
};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};

const NOTES_DB_FILE_NAME: &str = "notekeep.sqlite3";
const NOTES_DB_PATH_ENV: &str = "NOTEKEEP_DB_PATH";
const STORAGE_UNAVAILABLE_MESSAGE: &str = "Unable to open notes storage. Please try again.";
const NAV_STATE_INVALID_MESSAGE: &str = "Navigation state is invalid.";
const NAV_STATE_SAVE_FAILED_MESSAGE: &str = "Unable to save navigation state.";

static NOTES_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static NOTES_LOCK: Mutex<()> = Mutex::new(());

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
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the database file used by all note calls.
///
/// Must run before the first note call; later calls may only repeat the
/// same path. Without it, `$NOTEKEEP_DB_PATH` or a temp-dir file is used.
///
/// # FFI contract
/// - Sync call, no I/O.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_db_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "db path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    if !requested.is_absolute() {
        return format!("db path must be absolute, got `{trimmed}`");
    }

    let active = NOTES_DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "db path already set to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// Note projection returned to the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteItem {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Content cut for dashboard cards.
    pub preview: String,
    /// `Important|Normal|Low`, or the unrecognized stored label.
    pub importance: String,
    /// Palette color as `#RRGGBB`.
    pub color: String,
    /// Stored ISO-8601 timestamp.
    pub date_time: String,
    /// Card date `MM/DD/YYYY` in device local time; `None` when unparsable.
    pub date: Option<String>,
    /// Card time `hh:mm AM` in device local time; `None` when unparsable.
    pub time: Option<String>,
    /// `Created on: MM/DD/YYYY at hh:mm AM` in device local time.
    pub created_on: String,
}

/// Dashboard response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct NotesListResponse {
    pub ok: bool,
    pub items: Vec<NoteItem>,
    /// Grid column count for the requested width.
    pub columns: u32,
    /// Card width for the requested width.
    pub item_width: f64,
    /// Empty-state text, error text, or empty string.
    pub message: String,
}

/// Single-note lookup envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteGetResponse {
    pub item: Option<NoteItem>,
    pub message: String,
}

/// Navigator state lookup envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavStateResponse {
    /// Persisted stack JSON, or `None` for a fresh start.
    pub state_json: Option<String>,
    /// Error text, or empty string.
    pub message: String,
}

/// Save/delete action envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteActionResponse {
    /// Whether the write completed.
    pub ok: bool,
    /// Affected note id.
    pub note_id: Option<String>,
    /// Alert text for the UI.
    pub message: String,
}

impl NoteActionResponse {
    fn success(message: impl Into<String>, note_id: String) -> Self {
        Self {
            ok: true,
            note_id: Some(note_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            note_id: None,
            message: message.into(),
        }
    }
}

/// Lists all notes for a dashboard of logical `width`.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; `ok=false` with a message when storage fails.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_list(width: f64) -> NotesListResponse {
    match with_note_service("notes_list", |service| service.list_notes()) {
        Ok(notes) => {
            let view = DashboardView::from_notes(notes, width, &Local);
            NotesListResponse {
                ok: true,
                items: view
                    .notes
                    .iter()
                    .zip(view.cards)
                    .map(|(note, card)| to_note_item(note, card))
                    .collect(),
                columns: grid_columns(view.layout.columns),
                item_width: view.layout.item_width,
                message: view.empty_message.unwrap_or_default().to_string(),
            }
        }
        Err(message) => {
            let layout = DashboardLayout::for_width(width);
            NotesListResponse {
                ok: false,
                items: Vec::new(),
                columns: grid_columns(layout.columns),
                item_width: layout.item_width,
                message,
            }
        }
    }
}

/// Gets one note by id.
#[flutter_rust_bridge::frb(sync)]
pub fn note_get(note_id: String) -> NoteGetResponse {
    let id = NoteId::from(note_id.trim());
    match with_note_service("note_get", |service| service.get_note(&id)) {
        Ok(note) => NoteGetResponse {
            item: Some(to_note_item(&note, NoteCard::from_note(&note, &Local))),
            message: String::new(),
        },
        Err(message) => NoteGetResponse {
            item: None,
            message,
        },
    }
}

/// Saves the note form.
///
/// Input semantics:
/// - `note_id`: `None` or blank creates; otherwise replaces that note.
/// - `importance`: stored label; blank means `Normal`.
///
/// # FFI contract
/// - Sync call; returns after the write completed or failed.
/// - Blank titles are rejected without touching storage.
#[flutter_rust_bridge::frb(sync)]
pub fn note_save(
    note_id: Option<String>,
    title: String,
    content: String,
    importance: String,
) -> NoteActionResponse {
    let draft = NoteDraft {
        id: note_id
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(NoteId::from),
        title,
        content,
        importance: parse_importance(importance.as_str()),
    };
    match with_note_service("note_save", |service| service.save_note(&draft)) {
        Ok(note) => NoteActionResponse::success("Note saved!", note.id.to_string()),
        Err(message) => NoteActionResponse::failure(message),
    }
}

/// Deletes one note after user confirmation.
///
/// # FFI contract
/// - Sync call; returns after the write completed or failed.
/// - A note that no longer exists yields `ok=false` and
///   "The note no longer exists." without writing.
#[flutter_rust_bridge::frb(sync)]
pub fn note_delete(note_id: String) -> NoteActionResponse {
    let id = NoteId::from(note_id.trim());
    match with_note_service("note_delete", |service| service.delete_note(&id)) {
        Ok(()) => NoteActionResponse::success("Note deleted.", id.to_string()),
        Err(message) => NoteActionResponse::failure(message),
    }
}

/// Persists the navigator stack so the next launch can restore it.
///
/// Input semantics:
/// - `state_json`: stack JSON as returned by `nav_state_restore`; it must
///   hold at least one route.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn nav_state_save(state_json: String) -> String {
    let stack = match NavigationStack::from_json(state_json.as_str()) {
        Ok(stack) => stack,
        Err(err) => {
            warn!("event=nav_state_save module=ffi status=error error_code=invalid_state error={err}");
            return NAV_STATE_INVALID_MESSAGE.to_string();
        }
    };
    let result = with_store("nav_state_save", |store| {
        NavigationStore::new(store).persist(&stack).map_err(|err| {
            warn!("event=nav_state_save module=ffi status=error error={err}");
            NAV_STATE_SAVE_FAILED_MESSAGE.to_string()
        })
    });
    result.err().unwrap_or_default()
}

/// Restores the persisted navigator stack.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Missing or unreadable state yields `state_json=None` and no message.
#[flutter_rust_bridge::frb(sync)]
pub fn nav_state_restore() -> NavStateResponse {
    let restored = with_store("nav_state_restore", |store| {
        Ok(NavigationStore::new(store).restore())
    });
    match restored {
        Ok(Some(stack)) => match stack.to_json() {
            Ok(state_json) => NavStateResponse {
                state_json: Some(state_json),
                message: String::new(),
            },
            Err(err) => {
                error!("event=nav_state_restore module=ffi status=error error_code=encode_failed error={err}");
                NavStateResponse {
                    state_json: None,
                    message: NAV_STATE_INVALID_MESSAGE.to_string(),
                }
            }
        },
        Ok(None) => NavStateResponse {
            state_json: None,
            message: String::new(),
        },
        Err(message) => NavStateResponse {
            state_json: None,
            message,
        },
    }
}

/// Forgets the persisted navigator stack.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn nav_state_clear() -> String {
    let result = with_store("nav_state_clear", |store| {
        NavigationStore::new(store).clear().map_err(|err| {
            warn!("event=nav_state_clear module=ffi status=error error={err}");
            NAV_STATE_SAVE_FAILED_MESSAGE.to_string()
        })
    });
    result.err().unwrap_or_default()
}

fn grid_columns(columns: usize) -> u32 {
    u32::try_from(columns).unwrap_or(1)
}

fn parse_importance(value: &str) -> Importance {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Importance::default()
    } else {
        Importance::parse(trimmed)
    }
}

fn resolve_db_path() -> PathBuf {
    NOTES_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(NOTES_DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(NOTES_DB_FILE_NAME)
        })
        .clone()
}

fn with_store<T>(
    operation: &'static str,
    f: impl FnOnce(&SqliteKeyValueStore<'_>) -> Result<T, String>,
) -> Result<T, String> {
    let _guard = NOTES_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| {
        error!("event={operation} module=ffi status=error error_code=db_open_failed error={err}");
        STORAGE_UNAVAILABLE_MESSAGE.to_string()
    })?;
    let store = SqliteKeyValueStore::try_new(&conn).map_err(|err| {
        error!("event={operation} module=ffi status=error error_code=store_init_failed error={err}");
        STORAGE_UNAVAILABLE_MESSAGE.to_string()
    })?;
    f(&store)
}

fn with_note_service<T>(
    operation: &'static str,
    f: impl FnOnce(&mut NoteService<&SqliteKeyValueStore<'_>>) -> Result<T, NoteServiceError>,
) -> Result<T, String> {
    with_store(operation, |store| {
        let mut service = NoteService::new(NoteRepository::new(store));
        f(&mut service).map_err(|err| {
            warn!("event={operation} module=ffi status=error error={err}");
            err.user_message().to_string()
        })
    })
}

fn to_note_item(note: &Note, card: NoteCard) -> NoteItem {
    let detail = NoteDetail::from_note(note, &Local);
    NoteItem {
        id: note.id.to_string(),
        title: note.title.clone(),
        content: note.content.clone(),
        preview: card.preview,
        importance: card.importance_label,
        color: card.color.to_string(),
        date_time: note.date_time.clone(),
        date: card.date,
        time: card.time,
        created_on: detail.created_on,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        configure_db_path, core_version, init_logging, nav_state_clear, nav_state_restore,
        nav_state_save, note_delete, note_get, note_save, notes_list, ping,
    };
    use notekeep_core::view::navigation::{NavigationStack, Route};
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn configure_db_path_rejects_blank_and_relative_paths() {
        assert!(!configure_db_path("  ".to_string()).is_empty());
        assert!(configure_db_path("notes.db".to_string()).contains("absolute"));
    }

    #[test]
    fn note_save_creates_then_edits_same_note() {
        let title = unique_token("ffi-save");
        let created = note_save(None, title.clone(), "body".to_string(), String::new());
        assert!(created.ok, "{}", created.message);
        assert_eq!(created.message, "Note saved!");
        let note_id = created.note_id.expect("created note should return note_id");

        let edited = note_save(
            Some(note_id.clone()),
            title.clone(),
            "body".to_string(),
            "Important".to_string(),
        );
        assert!(edited.ok, "{}", edited.message);
        assert_eq!(edited.note_id.as_deref(), Some(note_id.as_str()));

        let fetched = note_get(note_id).item.expect("note should exist");
        assert_eq!(fetched.importance, "Important");
        assert_eq!(fetched.color, "#F45889");
        assert!(fetched.created_on.starts_with("Created on: "));
        let date = fetched.date.expect("saved note should have a card date");
        let time = fetched.time.expect("saved note should have a card time");
        assert_eq!(date.len(), "05/01/2024".len());
        assert!(time.ends_with("AM") || time.ends_with("PM"));

        let listed = notes_list(1500.0);
        assert!(listed.ok, "{}", listed.message);
        assert_eq!(listed.columns, 3);
        assert!(listed.items.iter().any(|item| item.title == title));
    }

    #[test]
    fn note_save_rejects_blank_title() {
        let response = note_save(None, "   ".to_string(), String::new(), String::new());
        assert!(!response.ok);
        assert_eq!(response.message, "Note title cannot be empty.");
    }

    #[test]
    fn note_delete_reports_missing_note_on_second_call() {
        let created = note_save(
            None,
            unique_token("ffi-delete"),
            String::new(),
            "Low".to_string(),
        );
        let note_id = created.note_id.expect("created note should return note_id");

        let first = note_delete(note_id.clone());
        assert!(first.ok, "{}", first.message);
        let second = note_delete(note_id.clone());
        assert!(!second.ok);
        assert_eq!(second.message, "The note no longer exists.");
        assert!(note_get(note_id).item.is_none());
    }

    #[test]
    fn nav_state_round_trips_and_clears() {
        let state_json = r#"{"routes":[{"name":"Dashboard"},{"name":"Form","params":{"note":null}}]}"#;
        assert_eq!(nav_state_save(state_json.to_string()), "");

        let restored = nav_state_restore();
        assert_eq!(restored.message, "");
        let stack = NavigationStack::from_json(
            restored
                .state_json
                .as_deref()
                .expect("saved state should be restored"),
        )
        .unwrap();
        assert_eq!(stack.current(), &Route::Form { note: None });
        assert!(stack.can_go_back());

        assert_eq!(nav_state_clear(), "");
        assert_eq!(nav_state_restore().state_json, None);
    }

    #[test]
    fn nav_state_save_rejects_empty_or_malformed_state() {
        assert_eq!(
            nav_state_save(r#"{"routes":[]}"#.to_string()),
            "Navigation state is invalid."
        );
        assert_eq!(
            nav_state_save("not json".to_string()),
            "Navigation state is invalid."
        );
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
