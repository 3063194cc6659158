//! Relationship records: the people that make up a user's circle.
//!
//! The roster walked by a check-in round is the owner's relationships in
//! ascending creation order. Records are never touched by the check-in flow.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// How the owner is related to a person in their circle.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RelationshipType {
  Partner,
  Family,
  Friend,
  Mentor,
  Child,
  Colleague,
  Other,
}

impl RelationshipType {
  /// Parse the lowercase storage form.
  pub fn parse(s: &str) -> Result<Self> {
    Self::from_str(s).map_err(|_| Error::UnknownVariant {
      kind:  "relationship type",
      value: s.to_owned(),
    })
  }

  pub fn as_str(self) -> &'static str { self.into() }
}

/// One person in the owner's circle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipRecord {
  pub id:                Uuid,
  pub owner_id:          Uuid,
  pub name:              String,
  pub relationship_type: RelationshipType,
  pub notes:             Option<String>,
  /// Opaque reference to an uploaded photo; upload itself lives elsewhere.
  pub photo_ref:         Option<String>,
  /// Store-assigned; defines roster order.
  pub created_at:        DateTime<Utc>,
}

/// Input to [`crate::store::CircleStore::add_relationship`].
/// `id` and `created_at` are always set by the store.
#[derive(Debug, Clone)]
pub struct NewRelationship {
  pub owner_id:          Uuid,
  pub name:              String,
  pub relationship_type: RelationshipType,
  pub notes:             Option<String>,
  pub photo_ref:         Option<String>,
}

impl NewRelationship {
  /// Build a relationship with no notes or photo. The name is trimmed and
  /// must not be empty.
  pub fn new(
    owner_id: Uuid,
    name: impl AsRef<str>,
    relationship_type: RelationshipType,
  ) -> Result<Self> {
    let name = name.as_ref().trim();
    if name.is_empty() {
      return Err(Error::EmptyName);
    }
    Ok(Self {
      owner_id,
      name: name.to_owned(),
      relationship_type,
      notes: None,
      photo_ref: None,
    })
  }
}
