//! Domain model for stored notes and form drafts.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own the persisted field naming of a note record.
//!
//! # Invariants
//! - Every stored note is identified by a `NoteId` unique in its collection.
//! - Deletion is a hard removal from the collection; there are no tombstones.

pub mod note;
