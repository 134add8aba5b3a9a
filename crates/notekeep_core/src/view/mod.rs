//! View-model support for the dashboard, form and detail screens.
//!
//! # Responsibility
//! - Project notes into what each screen renders.
//! - Hold navigator state and the flows that move between screens.
//!
//! Rendering itself happens in the UI layer; nothing here draws.

pub mod display;
pub mod flow;
pub mod navigation;
pub mod responsive;
