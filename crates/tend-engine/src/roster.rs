//! Roster loading: the read that starts every round.

use std::sync::Arc;

use tend_core::{relationship::RelationshipRecord, store::CircleStore};
use uuid::Uuid;

use crate::{EngineError, Result};

/// Reads the ordered roster for an owner.
pub struct RosterLoader<S> {
  store: Arc<S>,
}

impl<S: CircleStore> RosterLoader<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// The owner's relationships, oldest first. An empty roster is a valid
  /// result; a read failure is a blocking error.
  pub async fn load(&self, owner: Uuid) -> Result<Vec<RelationshipRecord>> {
    let roster = self
      .store
      .list_relationships(owner)
      .await
      .map_err(|e| EngineError::RosterUnavailable(Box::new(e)))?;
    tracing::debug!(%owner, size = roster.len(), "roster loaded");
    Ok(roster)
  }
}
