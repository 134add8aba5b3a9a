//! Note use-case service.
//!
//! # Responsibility
//! - Provide form-level save/delete/get/list APIs.
//! - Reject invalid drafts before any storage access.
//! - Translate repository failures into user-facing conditions.
//!
//! # Invariants
//! - `save_note` creates when the draft has no id and fully replaces the
//!   stored note otherwise; it never inserts for a missing id.
//! - Write failures are always returned, never swallowed.

use crate::model::note::{Note, NoteDraft, NoteId, NoteValidationError};
use crate::repo::note_repo::{NoteRepository, RepoError};
use crate::storage::kv_store::KeyValueStore;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Draft rejected before touching storage.
    Validation(NoteValidationError),
    /// Target note is no longer stored.
    NoteNotFound(NoteId),
    /// Reading the collection failed.
    LoadFailed(RepoError),
    /// Writing a created or edited note failed.
    SaveFailed(RepoError),
    /// Writing the collection without the deleted note failed.
    DeleteFailed(RepoError),
}

impl NoteServiceError {
    /// Message suitable for an alert shown to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Validation(NoteValidationError::EmptyTitle) => "Note title cannot be empty.",
            Self::NoteNotFound(_) => "The note no longer exists.",
            Self::LoadFailed(_) => "Unable to load notes. Please try again.",
            Self::SaveFailed(_) => "Failed to save note. Please try again.",
            Self::DeleteFailed(_) => "Unable to delete the note. Please try again.",
        }
    }
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid note: {err}"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::LoadFailed(err) => write!(f, "failed to load notes: {err}"),
            Self::SaveFailed(err) => write!(f, "failed to save note: {err}"),
            Self::DeleteFailed(err) => write!(f, "failed to delete note: {err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NoteNotFound(_) => None,
            Self::LoadFailed(err) | Self::SaveFailed(err) | Self::DeleteFailed(err) => Some(err),
        }
    }
}

impl From<NoteValidationError> for NoteServiceError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Note service facade over the repository.
pub struct NoteService<S: KeyValueStore> {
    repo: NoteRepository<S>,
}

impl<S: KeyValueStore> NoteService<S> {
    /// Creates a service using the provided repository.
    pub fn new(repo: NoteRepository<S>) -> Self {
        Self { repo }
    }

    /// Gives read access to the underlying repository.
    pub fn repository(&self) -> &NoteRepository<S> {
        &self.repo
    }

    /// Saves a submitted form: create without id, full replace with id.
    ///
    /// # Errors
    /// - `Validation` for a blank title; storage is not touched.
    /// - `NoteNotFound` when editing a note that was deleted meanwhile.
    /// - `SaveFailed` when the write fails.
    pub fn save_note(&mut self, draft: &NoteDraft) -> Result<Note, NoteServiceError> {
        if let Err(err) = draft.validate() {
            warn!("event=note_save module=service status=rejected reason={err}");
            return Err(err.into());
        }

        let result = match draft.id.as_ref() {
            Some(id) => self.repo.update(id, draft),
            None => self.repo.create(draft),
        };
        result.map_err(|err| match err {
            RepoError::NotFound(id) => NoteServiceError::NoteNotFound(id),
            other => NoteServiceError::SaveFailed(other),
        })
    }

    /// Deletes one note.
    ///
    /// # Errors
    /// - `NoteNotFound` when the note is already gone; nothing is written.
    /// - `DeleteFailed` when reading or writing the collection fails.
    pub fn delete_note(&mut self, id: &NoteId) -> Result<(), NoteServiceError> {
        self.repo.delete(id).map_err(|err| match err {
            RepoError::NotFound(id) => NoteServiceError::NoteNotFound(id),
            other => NoteServiceError::DeleteFailed(other),
        })
    }

    /// Gets one note by id.
    pub fn get_note(&mut self, id: &NoteId) -> Result<Note, NoteServiceError> {
        self.repo
            .get(id)
            .map_err(NoteServiceError::LoadFailed)?
            .ok_or_else(|| NoteServiceError::NoteNotFound(id.clone()))
    }

    /// Lists every stored note in stored order.
    pub fn list_notes(&mut self) -> Result<Vec<Note>, NoteServiceError> {
        self.repo.list().map_err(NoteServiceError::LoadFailed)
    }
}
