//! Repository layer over stored notes.
//!
//! # Responsibility
//! - Define use-case oriented data access over the note collection.
//! - Isolate key-value and serialization details from service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateId`) in
//!   addition to storage transport errors.
//! - Title validation is not a repository concern.

pub mod note_repo;
