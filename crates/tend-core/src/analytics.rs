//! Analytics events: schema-free product telemetry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{Error, Result};

/// Well-known event names.
pub mod names {
  pub const SESSION_START: &str = "session_start";
  pub const CHECKIN_COMPLETE: &str = "checkin_complete";
  pub const CHECKIN_ROUND_COMPLETE: &str = "checkin_round_complete";
  pub const ECHO_GENERATED: &str = "echo_generated";
  pub const CIRCLE_UPDATED: &str = "circle_updated";
  pub const DREAM_SAVED: &str = "dream_saved";
  pub const SPARK_CREATED: &str = "spark_created";
}

/// A persisted analytics event. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
  pub id:         Uuid,
  pub owner_id:   Uuid,
  pub event_name: String,
  pub metadata:   Map<String, Value>,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::CircleStore::record_analytics_event`].
#[derive(Debug, Clone)]
pub struct NewAnalyticsEvent {
  pub owner_id:   Uuid,
  pub event_name: String,
  pub metadata:   Map<String, Value>,
}

impl NewAnalyticsEvent {
  /// Build an event from any JSON value. Objects are taken as-is and null
  /// becomes empty metadata; anything else is rejected.
  pub fn from_value(
    owner_id: Uuid,
    event_name: impl Into<String>,
    metadata: Value,
  ) -> Result<Self> {
    match metadata {
      Value::Object(metadata) => Ok(Self {
        owner_id,
        event_name: event_name.into(),
        metadata,
      }),
      Value::Null => Ok(Self {
        owner_id,
        event_name: event_name.into(),
        metadata: Map::new(),
      }),
      _ => Err(Error::MetadataNotObject),
    }
  }
}
