//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with a fixed microsecond width so
//! that lexical order matches chronological order. Enums use their lowercase
//! names. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use tend_core::{
  analytics::AnalyticsEvent,
  checkin::{CheckInEvent, CheckInType, Note},
  echo::{EchoRecord, EchoSource},
  profile::Profile,
  relationship::{RelationshipRecord, RelationshipType},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

/// The current time at the precision the store keeps.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `relationships` row.
pub struct RawRelationship {
  pub relationship_id:   String,
  pub owner_id:          String,
  pub name:              String,
  pub relationship_type: String,
  pub notes:             Option<String>,
  pub photo_ref:         Option<String>,
  pub created_at:        String,
}

impl RawRelationship {
  pub const COLUMNS: &'static str = "relationship_id, owner_id, name, \
                                     relationship_type, notes, photo_ref, \
                                     created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      relationship_id:   row.get(0)?,
      owner_id:          row.get(1)?,
      name:              row.get(2)?,
      relationship_type: row.get(3)?,
      notes:             row.get(4)?,
      photo_ref:         row.get(5)?,
      created_at:        row.get(6)?,
    })
  }

  pub fn into_record(self) -> Result<RelationshipRecord> {
    Ok(RelationshipRecord {
      id:                decode_uuid(&self.relationship_id)?,
      owner_id:          decode_uuid(&self.owner_id)?,
      name:              self.name,
      relationship_type: RelationshipType::parse(&self.relationship_type)?,
      notes:             self.notes,
      photo_ref:         self.photo_ref,
      created_at:        decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `checkins` row.
pub struct RawCheckIn {
  pub checkin_id:      String,
  pub owner_id:        String,
  pub relationship_id: String,
  pub kind:            String,
  pub note:            Option<String>,
  pub created_at:      String,
}

impl RawCheckIn {
  pub const COLUMNS: &'static str =
    "checkin_id, owner_id, relationship_id, type, note, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      checkin_id:      row.get(0)?,
      owner_id:        row.get(1)?,
      relationship_id: row.get(2)?,
      kind:            row.get(3)?,
      note:            row.get(4)?,
      created_at:      row.get(5)?,
    })
  }

  pub fn into_event(self) -> Result<CheckInEvent> {
    Ok(CheckInEvent {
      id:              decode_uuid(&self.checkin_id)?,
      owner_id:        decode_uuid(&self.owner_id)?,
      relationship_id: decode_uuid(&self.relationship_id)?,
      kind:            CheckInType::parse(&self.kind)?,
      note:            self.note.map(Note::try_from).transpose()?,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `profiles` row.
pub struct RawProfile {
  pub owner_id:       String,
  pub echoes_enabled: bool,
  pub updated_at:     String,
}

impl RawProfile {
  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile {
      owner_id:       decode_uuid(&self.owner_id)?,
      echoes_enabled: self.echoes_enabled,
      updated_at:     Some(decode_dt(&self.updated_at)?),
    })
  }
}

/// Raw strings read directly from an `echoes` row.
pub struct RawEcho {
  pub echo_id:          String,
  pub owner_id:         String,
  pub relationship_id:  Option<String>,
  pub source:           String,
  pub text:             String,
  pub importance_score: i64,
  pub created_at:       String,
}

impl RawEcho {
  pub const COLUMNS: &'static str = "echo_id, owner_id, relationship_id, \
                                     source, text, importance_score, \
                                     created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      echo_id:          row.get(0)?,
      owner_id:         row.get(1)?,
      relationship_id:  row.get(2)?,
      source:           row.get(3)?,
      text:             row.get(4)?,
      importance_score: row.get(5)?,
      created_at:       row.get(6)?,
    })
  }

  pub fn into_record(self) -> Result<EchoRecord> {
    Ok(EchoRecord {
      id:               decode_uuid(&self.echo_id)?,
      owner_id:         decode_uuid(&self.owner_id)?,
      relationship_id:  self
        .relationship_id
        .as_deref()
        .map(decode_uuid)
        .transpose()?,
      source:           EchoSource::parse(&self.source)?,
      text:             self.text,
      importance_score: self.importance_score,
      created_at:       decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from an `analytics_events` row.
pub struct RawAnalyticsEvent {
  pub event_id:   String,
  pub owner_id:   String,
  pub event_name: String,
  pub metadata:   String,
  pub created_at: String,
}

impl RawAnalyticsEvent {
  pub fn into_event(self) -> Result<AnalyticsEvent> {
    Ok(AnalyticsEvent {
      id:         decode_uuid(&self.event_id)?,
      owner_id:   decode_uuid(&self.owner_id)?,
      event_name: self.event_name,
      metadata:   serde_json::from_str(&self.metadata)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
