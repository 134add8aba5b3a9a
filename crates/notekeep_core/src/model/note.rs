//! Note domain model.
//!
//! # Responsibility
//! - Define the stored note record and its serialized field names.
//! - Define the form payload (`NoteDraft`) and its write-time validation.
//!
//! # Invariants
//! - `id` is unique across the stored collection.
//! - `date_time` is an ISO-8601 UTC timestamp refreshed on every save.
//! - Unrecognized importance labels survive a load/save round-trip verbatim.
//! - One odd field in a stored record never rejects the record: null or
//!   non-text values are read as defaults or as their JSON text.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier of a stored note.
///
/// Generated notes use epoch milliseconds rendered as decimal text; ids
/// read from storage may be any text, or a number that is read as its text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl<'de> Deserialize<'de> for NoteId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(id) => Ok(Self(id)),
            Value::Number(id) => Ok(Self(id.to_string())),
            other => Err(de::Error::custom(format!(
                "note id must be text or a number, got {other}"
            ))),
        }
    }
}

impl NoteId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Builds the id a note created at `at` would receive.
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        Self(at.timestamp_millis().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Urgency tag attached to a note; also drives its display color.
///
/// Stored as its label text (`Important`, `Normal`, `Low`). Any other label
/// loads as `Unrecognized` and is written back unchanged. A stored `null`
/// loads as `Normal`; a non-text value loads as `Unrecognized` holding its
/// JSON text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum Importance {
    Important,
    #[default]
    Normal,
    Low,
    /// Label produced by some other writer; rendered with fallback styling.
    Unrecognized(String),
}

impl Importance {
    /// Selectable values, in form button order.
    pub const CHOICES: [Importance; 3] = [Self::Important, Self::Normal, Self::Low];

    /// Parses a stored label. Matching is exact, like the stored format.
    pub fn parse(label: &str) -> Self {
        match label {
            "Important" => Self::Important,
            "Normal" => Self::Normal,
            "Low" => Self::Low,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Important => "Important",
            Self::Normal => "Normal",
            Self::Low => "Low",
            Self::Unrecognized(label) => label.as_str(),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl Display for Importance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Importance {
    fn from(value: String) -> Self {
        match Self::parse(value.as_str()) {
            Self::Unrecognized(_) => Self::Unrecognized(value),
            known => known,
        }
    }
}

impl<'de> Deserialize<'de> for Importance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => Self::default(),
            Value::String(label) => Self::from(label),
            other => Self::Unrecognized(other.to_string()),
        })
    }
}

impl From<Importance> for String {
    fn from(value: Importance) -> Self {
        match value {
            Importance::Unrecognized(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

/// Stored note record.
///
/// Field order and names match the persisted JSON object:
/// `id`, `title`, `content`, `dateTime`, `importance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub content: String,
    /// ISO-8601 text, kept verbatim so foreign timestamps round-trip.
    #[serde(default, deserialize_with = "lenient_text")]
    pub date_time: String,
    #[serde(default)]
    pub importance: Importance,
}

/// Reads a text field written by any producer: `null` is empty, other
/// non-text values keep their JSON text.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    })
}

impl Note {
    /// Builds the record a draft turns into when saved at `saved_at`.
    pub fn from_draft(id: NoteId, draft: &NoteDraft, saved_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title.clone(),
            content: draft.content.clone(),
            date_time: format_timestamp(saved_at),
            importance: draft.importance.clone(),
        }
    }

    /// Parses `date_time`. Returns `None` for text that is not RFC 3339.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(self.date_time.as_str())
            .ok()
            .map(|value| value.with_timezone(&Utc))
    }
}

/// Formats a save time the way it is persisted (`2024-05-01T09:30:00.000Z`).
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Validation failures detected before any storage access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    EmptyTitle,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "note title cannot be empty"),
        }
    }
}

impl Error for NoteValidationError {}

/// Form payload used to create or edit a note.
///
/// `id = None` means create; `id = Some(..)` means replace that note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub id: Option<NoteId>,
    pub title: String,
    pub content: String,
    pub importance: Importance,
}

impl NoteDraft {
    /// Creates a draft in create mode.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        importance: Importance,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            importance,
        }
    }

    /// Creates a draft in edit mode, pre-filled from an existing note.
    pub fn editing(note: &Note) -> Self {
        Self {
            id: Some(note.id.clone()),
            title: note.title.clone(),
            content: note.content.clone(),
            importance: note.importance.clone(),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    /// Rejects drafts whose title is empty or whitespace-only.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.title.trim().is_empty() {
            return Err(NoteValidationError::EmptyTitle);
        }
        Ok(())
    }
}
