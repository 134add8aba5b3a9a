//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into form-level APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod note_service;
