//! Presentation projections for dashboard, detail and form screens.
//!
//! # Responsibility
//! - Map importance to its palette color and label.
//! - Build card/detail view models with truncated previews and US-style dates.
//!
//! # Invariants
//! - Unrecognized importance never fails rendering; it gets fallback colors.
//! - Note titles and content are rendered verbatim, never normalized.

use crate::model::note::{Importance, Note, NoteDraft, NoteId};
use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// Number of content characters shown on a dashboard card.
pub const CARD_PREVIEW_CHARS: usize = 100;
pub const EMPTY_DASHBOARD_MESSAGE: &str = "No notes created yet. Click ADD to create one!";
pub const DASHBOARD_HEADING: &str = "Your Notes";

const IMPORTANT_COLOR: &str = "#F45889";
const NORMAL_COLOR: &str = "#456990";
const LOW_COLOR: &str = "#7EE4EC";
const UNRECOGNIZED_CARD_COLOR: &str = "#D3D3D3";
const UNKNOWN_DATE: &str = "Unknown date";

/// Card and detail background/text color for an importance tag.
pub fn card_color(importance: &Importance) -> &'static str {
    match importance {
        Importance::Important => IMPORTANT_COLOR,
        Importance::Normal => NORMAL_COLOR,
        Importance::Low => LOW_COLOR,
        Importance::Unrecognized(_) => UNRECOGNIZED_CARD_COLOR,
    }
}

/// Form accent color; unrecognized tags fall back to the Normal blue.
pub fn accent_color(importance: &Importance) -> &'static str {
    match importance {
        Importance::Unrecognized(_) => NORMAL_COLOR,
        known => card_color(known),
    }
}

/// Shortens `text` to `max_chars` characters, appending `...` when cut.
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated = text.chars().take(max_chars).collect::<String>();
    truncated.push_str("...");
    truncated
}

/// `05/01/2024`
pub fn format_date<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    at.format("%m/%d/%Y").to_string()
}

/// `09:30 AM`
pub fn format_time<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    at.format("%I:%M %p").to_string()
}

/// `05/01/2024 at 09:30 AM`
pub fn format_date_time<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    format!("{} at {}", format_date(at), format_time(at))
}

/// Header shown on the form screen.
pub fn form_title(draft: &NoteDraft) -> &'static str {
    if draft.is_edit() {
        "Edit Note"
    } else {
        "Add New Note"
    }
}

/// Dashboard card view model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCard {
    pub id: NoteId,
    pub title: String,
    /// Content cut to `CARD_PREVIEW_CHARS`.
    pub preview: String,
    pub importance_label: String,
    pub color: &'static str,
    /// `None` when the stored timestamp cannot be parsed.
    pub date: Option<String>,
    pub time: Option<String>,
}

impl NoteCard {
    /// Projects a note for a dashboard rendered in `tz`.
    pub fn from_note<Tz: TimeZone>(note: &Note, tz: &Tz) -> Self
    where
        Tz::Offset: Display,
    {
        let local = note.timestamp().map(|at| at.with_timezone(tz));
        Self {
            id: note.id.clone(),
            title: note.title.clone(),
            preview: truncate_preview(note.content.as_str(), CARD_PREVIEW_CHARS),
            importance_label: note.importance.to_string(),
            color: card_color(&note.importance),
            date: local.as_ref().map(format_date),
            time: local.as_ref().map(format_time),
        }
    }
}

/// Detail screen view model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDetail {
    pub id: NoteId,
    pub title: String,
    /// `Created on: 05/01/2024 at 09:30 AM`
    pub created_on: String,
    pub importance_label: String,
    pub color: &'static str,
    pub content: String,
}

impl NoteDetail {
    pub fn from_note<Tz: TimeZone>(note: &Note, tz: &Tz) -> Self
    where
        Tz::Offset: Display,
    {
        let when = note
            .timestamp()
            .map(|at| format_date_time(&at.with_timezone(tz)))
            .unwrap_or_else(|| UNKNOWN_DATE.to_string());
        Self {
            id: note.id.clone(),
            title: note.title.clone(),
            created_on: format!("Created on: {when}"),
            importance_label: note.importance.to_string(),
            color: card_color(&note.importance),
            content: note.content.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        accent_color, card_color, form_title, format_date_time, truncate_preview, NoteCard,
        NoteDetail,
    };
    use crate::model::note::{Importance, Note, NoteDraft, NoteId};
    use chrono::{FixedOffset, TimeZone, Utc};

    fn sample_note(content: &str, importance: Importance) -> Note {
        Note {
            id: NoteId::new("1714555800000"),
            title: "Groceries".to_string(),
            content: content.to_string(),
            date_time: "2024-05-01T14:05:00.000Z".to_string(),
            importance,
        }
    }

    #[test]
    fn palette_uses_fallbacks_for_unrecognized_tags() {
        let odd = Importance::parse("Urgent");
        assert_eq!(card_color(&Importance::Important), "#F45889");
        assert_eq!(card_color(&Importance::Low), "#7EE4EC");
        assert_eq!(card_color(&odd), "#D3D3D3");
        assert_eq!(accent_color(&odd), "#456990");
    }

    #[test]
    fn truncate_preview_counts_characters_not_bytes() {
        assert_eq!(truncate_preview("short", 10), "short");
        assert_eq!(truncate_preview("ééééé", 3), "ééé...");
        assert_eq!(truncate_preview(&"a".repeat(100), 100), "a".repeat(100));
    }

    #[test]
    fn format_date_time_uses_twelve_hour_clock() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 14, 5, 0).unwrap();
        assert_eq!(format_date_time(&at), "05/01/2024 at 02:05 PM");
    }

    #[test]
    fn card_projects_in_requested_timezone() {
        let note = sample_note(&"x".repeat(120), Importance::Normal);
        let paris = FixedOffset::east_opt(2 * 3600).unwrap();
        let card = NoteCard::from_note(&note, &paris);

        assert_eq!(card.preview.chars().count(), 103);
        assert!(card.preview.ends_with("..."));
        assert_eq!(card.date.as_deref(), Some("05/01/2024"));
        assert_eq!(card.time.as_deref(), Some("04:05 PM"));
        assert_eq!(card.color, "#456990");
    }

    #[test]
    fn detail_tolerates_unparsable_timestamp() {
        let mut note = sample_note("body", Importance::parse("whatever"));
        note.date_time = "not a date".to_string();
        let detail = NoteDetail::from_note(&note, &Utc);
        assert_eq!(detail.created_on, "Created on: Unknown date");
        assert_eq!(detail.importance_label, "whatever");
        assert_eq!(detail.color, "#D3D3D3");
    }

    #[test]
    fn form_title_reflects_mode() {
        let note = sample_note("", Importance::Low);
        assert_eq!(form_title(&NoteDraft::default()), "Add New Note");
        assert_eq!(form_title(&NoteDraft::editing(&note)), "Edit Note");
    }
}
