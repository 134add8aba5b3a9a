//! Screen flows combining the note service with the navigator.
//!
//! # Responsibility
//! - Run each screen action to completion before changing routes.
//! - Turn service failures into alerts without losing the current screen.
//!
//! # Invariants
//! - Navigation after a save or delete happens only once the write returned.
//! - A failed write leaves the navigation stack untouched.
//! - A stale delete goes back to the previous screen and reports it.

use crate::model::note::{Note, NoteDraft};
use crate::service::note_service::{NoteService, NoteServiceError};
use crate::storage::kv_store::KeyValueStore;
use crate::view::display::{NoteCard, DASHBOARD_HEADING, EMPTY_DASHBOARD_MESSAGE};
use crate::view::navigation::{NavigationStack, Route};
use crate::view::responsive::DashboardLayout;
use chrono::TimeZone;
use std::fmt::Display;

/// Alert surfaced to the user after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alert {
    pub title: &'static str,
    pub message: &'static str,
}

impl Alert {
    pub const fn success(message: &'static str) -> Self {
        Self {
            title: "Success",
            message,
        }
    }

    pub const fn error(message: &'static str) -> Self {
        Self {
            title: "Error",
            message,
        }
    }
}

impl From<&NoteServiceError> for Alert {
    fn from(value: &NoteServiceError) -> Self {
        Self::error(value.user_message())
    }
}

/// Result of a completed form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub note: Note,
    pub alert: Alert,
}

/// Dashboard screen content.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub heading: &'static str,
    /// Stored notes in stored order; `cards[i]` renders `notes[i]`.
    pub notes: Vec<Note>,
    pub cards: Vec<NoteCard>,
    pub layout: DashboardLayout,
    /// Set when there is nothing to show.
    pub empty_message: Option<&'static str>,
}

impl DashboardView {
    /// Builds the dashboard for already loaded `notes`.
    pub fn from_notes<Tz>(notes: Vec<Note>, width: f64, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let cards = notes
            .iter()
            .map(|note| NoteCard::from_note(note, tz))
            .collect::<Vec<_>>();
        let empty_message = cards.is_empty().then_some(EMPTY_DASHBOARD_MESSAGE);
        Self {
            heading: DASHBOARD_HEADING,
            notes,
            cards,
            layout: DashboardLayout::for_width(width),
            empty_message,
        }
    }
}

/// Loads the dashboard for a window `width`, rendering dates in `tz`.
pub fn load_dashboard<S, Tz>(
    service: &mut NoteService<S>,
    width: f64,
    tz: &Tz,
) -> Result<DashboardView, Alert>
where
    S: KeyValueStore,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let notes = service.list_notes().map_err(|err| Alert::from(&err))?;
    Ok(DashboardView::from_notes(notes, width, tz))
}

/// Opens an empty form.
pub fn open_new_form(nav: &mut NavigationStack) {
    nav.navigate(Route::Form { note: None });
}

/// Opens the detail screen for `note`.
pub fn open_note(nav: &mut NavigationStack, note: Note) {
    nav.navigate(Route::Note { note });
}

/// Opens the form pre-filled with `note`.
pub fn open_edit_form(nav: &mut NavigationStack, note: Note) {
    nav.navigate(Route::Form { note: Some(note) });
}

/// Leaves the form without saving.
pub fn cancel_form(nav: &mut NavigationStack) -> bool {
    nav.go_back()
}

/// Saves `draft`, then returns to the dashboard.
///
/// On failure the form stays open and the alert explains why.
pub fn submit_form<S: KeyValueStore>(
    service: &mut NoteService<S>,
    nav: &mut NavigationStack,
    draft: &NoteDraft,
) -> Result<FormSubmission, Alert> {
    let note = service.save_note(draft).map_err(|err| Alert::from(&err))?;
    nav.navigate(Route::Dashboard);
    Ok(FormSubmission {
        note,
        alert: Alert::success("Note saved!"),
    })
}

/// Deletes `note` after the user confirmed.
///
/// - Success resets the stack to the dashboard.
/// - A note that no longer exists pops the detail screen and reports it.
/// - Any other failure keeps the detail screen open.
pub fn confirm_delete<S: KeyValueStore>(
    service: &mut NoteService<S>,
    nav: &mut NavigationStack,
    note: &Note,
) -> Result<(), Alert> {
    match service.delete_note(&note.id) {
        Ok(()) => {
            nav.reset(Route::Dashboard);
            Ok(())
        }
        Err(err @ NoteServiceError::NoteNotFound(_)) => {
            nav.go_back();
            Err(Alert::from(&err))
        }
        Err(err) => Err(Alert::from(&err)),
    }
}
