//! Echoes: short affirming messages derived from positive actions.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Default `importance_score` for generated echoes.
pub const DEFAULT_IMPORTANCE: i64 = 1;

/// The kind of action an echo reflects.
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
pub enum EchoSource {
  Checkin,
  Dream,
  Gratitude,
}

impl EchoSource {
  pub fn parse(s: &str) -> Result<Self> {
    Self::from_str(s).map_err(|_| Error::UnknownVariant {
      kind:  "echo source",
      value: s.to_owned(),
    })
  }

  pub fn as_str(self) -> &'static str { self.into() }
}

/// A persisted echo. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EchoRecord {
  pub id:               Uuid,
  pub owner_id:         Uuid,
  /// The relationship that triggered the echo, when there is one.
  pub relationship_id:  Option<Uuid>,
  pub source:           EchoSource,
  pub text:             String,
  pub importance_score: i64,
  pub created_at:       DateTime<Utc>,
}

/// Input to [`crate::store::CircleStore::record_echo`].
#[derive(Debug, Clone)]
pub struct NewEcho {
  pub owner_id:         Uuid,
  pub relationship_id:  Option<Uuid>,
  pub source:           EchoSource,
  pub text:             String,
  pub importance_score: i64,
}
