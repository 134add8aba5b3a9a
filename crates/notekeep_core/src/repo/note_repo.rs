//! Note repository over the whole-collection storage adapter.
//!
//! # Responsibility
//! - Provide create/get/list/update/delete over the stored note collection.
//! - Own an in-memory cache with explicit `reload`/`flush`.
//!
//! # Invariants
//! - Every operation is one linear read-all -> transform -> write-all cycle.
//! - The cache is replaced only after a write succeeded, so it never holds
//!   state that storage rejected.
//! - Update and delete of a missing id write nothing and report `NotFound`.
//! - Generated ids are unique within the collection.

use crate::model::note::{Note, NoteDraft, NoteId};
use crate::storage::kv_store::KeyValueStore;
use crate::storage::note_storage::NoteStorage;
use crate::storage::StorageError;
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Storage(StorageError),
    NotFound(NoteId),
    DuplicateId(NoteId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::DuplicateId(id) => write!(f, "note id already exists: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::NotFound(_) | Self::DuplicateId(_) => None,
        }
    }
}

impl From<StorageError> for RepoError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Note repository holding a cached copy of the stored collection.
pub struct NoteRepository<S: KeyValueStore> {
    storage: NoteStorage<S>,
    cache: Vec<Note>,
}

impl<S: KeyValueStore> NoteRepository<S> {
    /// Creates a repository with an empty cache. Call `reload` to populate it.
    pub fn new(store: S) -> Self {
        Self {
            storage: NoteStorage::new(store),
            cache: Vec::new(),
        }
    }

    /// Creates a repository and loads the stored collection into its cache.
    pub fn try_new(store: S) -> RepoResult<Self> {
        let mut repo = Self::new(store);
        repo.reload()?;
        Ok(repo)
    }

    /// Cached collection as of the last `reload` or successful write.
    pub fn cached(&self) -> &[Note] {
        &self.cache
    }

    /// Replaces the cache with the stored collection.
    pub fn reload(&mut self) -> RepoResult<&[Note]> {
        self.cache = self.storage.load()?;
        Ok(&self.cache)
    }

    /// Writes the cached collection back to storage.
    pub fn flush(&self) -> RepoResult<()> {
        self.storage.save(&self.cache)?;
        Ok(())
    }

    /// Lists every stored note in stored order.
    pub fn list(&mut self) -> RepoResult<Vec<Note>> {
        Ok(self.reload()?.to_vec())
    }

    /// Gets one note by id from freshly loaded storage.
    pub fn get(&mut self, id: &NoteId) -> RepoResult<Option<Note>> {
        let notes = self.reload()?;
        Ok(notes.iter().find(|note| &note.id == id).cloned())
    }

    /// Appends a note built from `draft`, stamped with the current time.
    ///
    /// Uses `draft.id` when present, otherwise a time-based id.
    ///
    /// # Errors
    /// - `DuplicateId` when `draft.id` is already stored.
    pub fn create(&mut self, draft: &NoteDraft) -> RepoResult<Note> {
        self.create_at(draft, Utc::now())
    }

    /// Replaces the note `id` with the fields of `draft`, stamped now.
    ///
    /// # Errors
    /// - `NotFound` when no stored note has `id`; nothing is written.
    pub fn update(&mut self, id: &NoteId, draft: &NoteDraft) -> RepoResult<Note> {
        self.update_at(id, draft, Utc::now())
    }

    /// Removes the note `id` after confirming it is still stored.
    ///
    /// # Errors
    /// - `NotFound` when the note is already gone; nothing is written.
    pub fn delete(&mut self, id: &NoteId) -> RepoResult<()> {
        let current = self.storage.load()?;
        if !current.iter().any(|note| &note.id == id) {
            warn!("event=note_delete module=repo status=not_found note_id={id}");
            self.cache = current;
            return Err(RepoError::NotFound(id.clone()));
        }

        let next = current
            .into_iter()
            .filter(|note| &note.id != id)
            .collect::<Vec<_>>();
        self.commit(next)?;
        info!(
            "event=note_delete module=repo status=ok note_id={} count={}",
            id,
            self.cache.len()
        );
        Ok(())
    }

    fn create_at(&mut self, draft: &NoteDraft, now: DateTime<Utc>) -> RepoResult<Note> {
        let mut next = self.storage.load()?;
        let id = match draft.id.as_ref() {
            Some(id) if next.iter().any(|note| &note.id == id) => {
                self.cache = next;
                return Err(RepoError::DuplicateId(id.clone()));
            }
            Some(id) => id.clone(),
            None => allocate_id(&next, now),
        };

        let note = Note::from_draft(id, draft, now);
        next.push(note.clone());
        self.commit(next)?;
        info!(
            "event=note_create module=repo status=ok note_id={} count={}",
            note.id,
            self.cache.len()
        );
        Ok(note)
    }

    fn update_at(
        &mut self,
        id: &NoteId,
        draft: &NoteDraft,
        now: DateTime<Utc>,
    ) -> RepoResult<Note> {
        let mut next = self.storage.load()?;
        let Some(index) = next.iter().position(|note| &note.id == id) else {
            warn!("event=note_update module=repo status=not_found note_id={id}");
            self.cache = next;
            return Err(RepoError::NotFound(id.clone()));
        };

        let note = Note::from_draft(id.clone(), draft, now);
        next[index] = note.clone();
        self.commit(next)?;
        info!("event=note_update module=repo status=ok note_id={}", note.id);
        Ok(note)
    }

    fn commit(&mut self, next: Vec<Note>) -> RepoResult<()> {
        self.storage.save(&next)?;
        self.cache = next;
        Ok(())
    }
}

/// Picks the creation-time id, stepping past ids already taken.
fn allocate_id(existing: &[Note], now: DateTime<Utc>) -> NoteId {
    let mut millis = now.timestamp_millis();
    loop {
        let candidate = NoteId::new(millis.to_string());
        if !existing.iter().any(|note| note.id == candidate) {
            return candidate;
        }
        millis += 1;
    }
}
