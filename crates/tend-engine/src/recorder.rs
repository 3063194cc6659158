//! Check-in persistence: the only write on the primary path.

use std::sync::Arc;

use tend_core::{
  checkin::{CheckInEvent, CheckInType, NewCheckIn, Note},
  store::CircleStore,
};
use uuid::Uuid;

use crate::{EngineError, Result};

/// Persists one check-in decision.
pub struct CheckInRecorder<S> {
  store: Arc<S>,
}

impl<S: CircleStore> CheckInRecorder<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Append one [`CheckInEvent`]. The note has already been trimmed and
  /// capped by [`Note::new`]. A failure here must stop the cursor.
  pub async fn record(
    &self,
    owner: Uuid,
    relationship_id: Uuid,
    kind: CheckInType,
    note: Option<Note>,
  ) -> Result<CheckInEvent> {
    let event = self
      .store
      .record_checkin(NewCheckIn { owner_id: owner, relationship_id, kind, note })
      .await
      .map_err(|e| {
        tracing::warn!(%owner, %relationship_id, error = %e, "check-in write failed");
        EngineError::CheckInNotSaved(Box::new(e))
      })?;
    tracing::debug!(%owner, %relationship_id, kind = %kind, "check-in recorded");
    Ok(event)
  }
}
