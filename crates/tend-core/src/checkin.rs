//! Check-in events: the append-only log of interaction decisions.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Maximum length of a check-in note, in characters.
pub const NOTE_MAX_CHARS: usize = 200;

/// The kind of interaction being recorded.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CheckInType {
  /// The owner actually reached out today.
  Pinged,
  /// The owner held the person in mind without contacting them.
  Thought,
}

impl CheckInType {
  pub fn parse(s: &str) -> Result<Self> {
    Self::from_str(s).map_err(|_| Error::UnknownVariant {
      kind:  "check-in type",
      value: s.to_owned(),
    })
  }

  pub fn as_str(self) -> &'static str { self.into() }
}

// ─── Note ────────────────────────────────────────────────────────────────────

/// A trimmed, non-empty check-in note of at most [`NOTE_MAX_CHARS`]
/// characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Note(String);

impl Note {
  /// Normalise raw user input. Whitespace-only input yields `None`; input
  /// longer than the limit is cut to the first [`NOTE_MAX_CHARS`] characters.
  pub fn new(raw: &str) -> Option<Self> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
      return None;
    }
    let note = match trimmed.char_indices().nth(NOTE_MAX_CHARS) {
      Some((cut, _)) => trimmed[..cut].trim_end(),
      None => trimmed,
    };
    Some(Self(note.to_owned()))
  }

  /// Like [`Note::new`] but for an optional field.
  pub fn from_optional(raw: Option<&str>) -> Option<Self> {
    raw.and_then(Self::new)
  }

  pub fn as_str(&self) -> &str { &self.0 }

  pub fn into_inner(self) -> String { self.0 }
}

impl AsRef<str> for Note {
  fn as_ref(&self) -> &str { &self.0 }
}

impl TryFrom<String> for Note {
  type Error = Error;

  fn try_from(raw: String) -> Result<Self> {
    Self::new(&raw).ok_or(Error::EmptyNote)
  }
}

impl From<Note> for String {
  fn from(note: Note) -> Self { note.0 }
}

// ─── CheckInEvent ────────────────────────────────────────────────────────────

/// One recorded interaction with a relationship. Never updated once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInEvent {
  pub id:              Uuid,
  pub owner_id:        Uuid,
  pub relationship_id: Uuid,
  #[serde(rename = "type")]
  pub kind:            CheckInType,
  pub note:            Option<Note>,
  pub created_at:      DateTime<Utc>,
}

/// Input to [`crate::store::CircleStore::record_checkin`].
#[derive(Debug, Clone)]
pub struct NewCheckIn {
  pub owner_id:        Uuid,
  pub relationship_id: Uuid,
  pub kind:            CheckInType,
  pub note:            Option<Note>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn note_is_trimmed() {
    assert_eq!(Note::new("  hi \n").unwrap().as_str(), "hi");
  }

  #[test]
  fn blank_note_is_absent() {
    assert!(Note::new("").is_none());
    assert!(Note::new(" \t ").is_none());
    assert!(Note::from_optional(None).is_none());
  }

  #[test]
  fn long_note_is_truncated_to_limit() {
    let raw = "x".repeat(250);
    let note = Note::new(&raw).unwrap();
    assert_eq!(note.as_str().chars().count(), NOTE_MAX_CHARS);
  }

  #[test]
  fn truncation_counts_characters_not_bytes() {
    let raw = "é".repeat(201);
    let note = Note::new(&raw).unwrap();
    assert_eq!(note.as_str().chars().count(), NOTE_MAX_CHARS);
    assert_eq!(note.as_str().len(), NOTE_MAX_CHARS * 2);
  }

  #[test]
  fn check_in_type_parses_lowercase_only() {
    assert_eq!(CheckInType::parse("pinged").unwrap(), CheckInType::Pinged);
    assert_eq!(CheckInType::Thought.to_string(), "thought");
    assert!(CheckInType::parse("waved").is_err());
  }
}
