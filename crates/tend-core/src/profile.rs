//! Per-owner preferences read by the check-in flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Owner preferences. An owner with no stored profile behaves as
/// [`Profile::default_for`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub owner_id:       Uuid,
  /// Gates all echo generation for this owner.
  pub echoes_enabled: bool,
  /// `None` until the profile is first written.
  pub updated_at:     Option<DateTime<Utc>>,
}

impl Profile {
  pub fn default_for(owner_id: Uuid) -> Self {
    Self { owner_id, echoes_enabled: true, updated_at: None }
  }
}
