//! Flutter-facing bindings for notekeep core.

pub mod api;
