//! Whole-collection note persistence.
//!
//! # Responsibility
//! - Load the full note collection from one fixed key.
//! - Save the full note collection back to the same key.
//!
//! # Invariants
//! - No partial updates: every save rewrites the complete JSON array.
//! - A missing key and an unparsable value both load as an empty collection.
//! - A store read failure is an error, so callers never write back over data
//!   they could not read.

use crate::model::note::Note;
use crate::storage::kv_store::KeyValueStore;
use crate::storage::StorageResult;
use log::{debug, error, warn};

/// Key under which the serialized note array is stored.
pub const NOTES_KEY: &str = "my_notes";

/// Storage adapter serializing the note collection as one value.
pub struct NoteStorage<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> NoteStorage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Loads every stored note.
    ///
    /// # Errors
    /// - Returns an error only when the key-value store itself fails.
    pub fn load(&self) -> StorageResult<Vec<Note>> {
        let raw = match self.store.get_item(NOTES_KEY) {
            Ok(raw) => raw,
            Err(err) => {
                error!(
                    "event=notes_load module=storage status=error error_code=store_read_failed error={}",
                    err
                );
                return Err(err);
            }
        };

        let Some(raw) = raw else {
            debug!("event=notes_load module=storage status=ok source=absent count=0");
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<Note>>(raw.as_str()) {
            Ok(notes) => {
                debug!(
                    "event=notes_load module=storage status=ok source=stored count={}",
                    notes.len()
                );
                Ok(notes)
            }
            Err(err) => {
                warn!(
                    "event=notes_load module=storage status=degraded error_code=parse_failed bytes={} line={} column={}",
                    raw.len(),
                    err.line(),
                    err.column()
                );
                Ok(Vec::new())
            }
        }
    }

    /// Replaces the stored collection with `notes`.
    pub fn save(&self, notes: &[Note]) -> StorageResult<()> {
        let encoded = serde_json::to_string(notes)?;
        if let Err(err) = self.store.set_item(NOTES_KEY, encoded.as_str()) {
            error!(
                "event=notes_save module=storage status=error error_code=store_write_failed count={} error={}",
                notes.len(),
                err
            );
            return Err(err);
        }

        debug!(
            "event=notes_save module=storage status=ok count={} bytes={}",
            notes.len(),
            encoded.len()
        );
        Ok(())
    }
}
