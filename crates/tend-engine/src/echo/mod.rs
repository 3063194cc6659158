//! Echo generation: a reflective message for a completed action.
//!
//! Generation is best-effort. Every failure (profile lookup, randomness,
//! persistence) is converted into an [`EchoOutcome`] and logged; nothing is
//! ever returned as an error to the caller.

pub mod templates;

use std::sync::{Arc, Mutex};

use rand_core::RngCore;
use tend_core::{
  checkin::CheckInType,
  echo::{DEFAULT_IMPORTANCE, EchoRecord, EchoSource, NewEcho},
  relationship::{RelationshipRecord, RelationshipType},
  store::CircleStore,
};
use uuid::Uuid;

use crate::SideEffectDispatcher;

/// The fields an echo template may reference.
#[derive(Debug, Clone, Default)]
pub struct EchoContext {
  /// Linked from the resulting [`EchoRecord`] when present.
  pub relationship_id:   Option<Uuid>,
  pub name:              Option<String>,
  pub relationship_type: Option<RelationshipType>,
  pub checkin_type:      Option<CheckInType>,
}

impl EchoContext {
  pub fn for_checkin(person: &RelationshipRecord, kind: CheckInType) -> Self {
    Self {
      relationship_id:   Some(person.id),
      name:              Some(person.name.clone()),
      relationship_type: Some(person.relationship_type),
      checkin_type:      Some(kind),
    }
  }
}

/// What happened to one generation attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum EchoOutcome {
  /// The owner turned echoes off; nothing was written.
  Disabled,
  Created(EchoRecord),
  Failed(String),
}

/// Picks and persists echo messages.
pub struct EchoGenerator<S> {
  store: Arc<S>,
  rng:   Mutex<Box<dyn RngCore + Send>>,
}

impl<S: CircleStore> EchoGenerator<S> {
  /// `rng` drives template selection; inject a fixed source for
  /// deterministic output.
  pub fn new(store: Arc<S>, rng: Box<dyn RngCore + Send>) -> Self {
    Self { store, rng: Mutex::new(rng) }
  }

  /// Generate and persist one echo for `owner`, unless their profile has
  /// echoes disabled.
  pub async fn generate(
    &self,
    owner: Uuid,
    source: EchoSource,
    context: EchoContext,
  ) -> EchoOutcome {
    let outcome = self.try_generate(owner, source, context).await;
    match &outcome {
      EchoOutcome::Disabled => tracing::debug!(%owner, "echoes disabled, skipping"),
      EchoOutcome::Created(echo) => {
        tracing::debug!(%owner, echo_id = %echo.id, %source, "echo created")
      }
      EchoOutcome::Failed(reason) => {
        tracing::warn!(%owner, %source, %reason, "echo generation failed")
      }
    }
    outcome
  }

  /// [`EchoGenerator::generate`], then report a created echo through
  /// `dispatcher`.
  pub async fn generate_and_report(
    &self,
    dispatcher: &SideEffectDispatcher<S>,
    owner: Uuid,
    source: EchoSource,
    context: EchoContext,
  ) -> EchoOutcome {
    let relationship_type = context.relationship_type;
    let outcome = self.generate(owner, source, context).await;
    if let EchoOutcome::Created(echo) = &outcome {
      dispatcher.echo_generated(owner, echo, relationship_type).await;
    }
    outcome
  }

  async fn try_generate(
    &self,
    owner: Uuid,
    source: EchoSource,
    context: EchoContext,
  ) -> EchoOutcome {
    let enabled = match self.store.get_profile(owner).await {
      Ok(profile) => profile.is_none_or(|p| p.echoes_enabled),
      Err(e) => return EchoOutcome::Failed(format!("profile lookup failed: {e}")),
    };
    if !enabled {
      return EchoOutcome::Disabled;
    }

    let text = match self.pick(source) {
      Ok(template) => template.render(&context),
      Err(reason) => return EchoOutcome::Failed(reason),
    };

    let input = NewEcho {
      owner_id: owner,
      relationship_id: context.relationship_id,
      source,
      text,
      importance_score: DEFAULT_IMPORTANCE,
    };
    match self.store.record_echo(input).await {
      Ok(record) => EchoOutcome::Created(record),
      Err(e) => EchoOutcome::Failed(format!("echo write failed: {e}")),
    }
  }

  /// Choose a template uniformly at random.
  fn pick(&self, source: EchoSource) -> Result<templates::Template, String> {
    let table = templates::table(source);
    let mut buf = [0u8; 4];
    {
      let mut rng = self
        .rng
        .lock()
        .map_err(|_| "randomness source poisoned".to_owned())?;
      rng
        .try_fill_bytes(&mut buf)
        .map_err(|e| format!("randomness source failed: {e}"))?;
    }
    Ok(table[scale(u32::from_le_bytes(buf), table.len())])
  }
}

/// Map a uniform `u32` onto `0..len` by widening multiplication.
fn scale(x: u32, len: usize) -> usize { ((u64::from(x) * len as u64) >> 32) as usize }

#[cfg(test)]
mod tests {
  use super::scale;

  #[test]
  fn scale_covers_the_whole_range() {
    assert_eq!(scale(0, 4), 0);
    assert_eq!(scale(u32::MAX / 4 + 1, 4), 1);
    assert_eq!(scale(u32::MAX / 2 + 1, 4), 2);
    assert_eq!(scale(u32::MAX, 4), 3);
  }
}
