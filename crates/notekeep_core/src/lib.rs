//! Core domain logic for notekeep.
//! This crate is the single source of truth for note invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{Importance, Note, NoteDraft, NoteId, NoteValidationError};
pub use repo::note_repo::{NoteRepository, RepoError, RepoResult};
pub use service::note_service::{NoteService, NoteServiceError};
pub use storage::kv_store::{KeyValueStore, SqliteKeyValueStore};
pub use storage::note_storage::{NoteStorage, NOTES_KEY};
pub use storage::{StorageError, StorageResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
