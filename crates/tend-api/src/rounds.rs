//! Handlers for `/rounds`: one in-memory progression controller per round.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/rounds` | 201 with the new round, or 200 with `round_id: null` for an empty roster |
//! | `GET`    | `/rounds/{id}` | Current state of a live round |
//! | `POST`   | `/rounds/{id}/check-in` | Body: [`CheckInBody`] |
//! | `POST`   | `/rounds/{id}/skip` | |
//! | `DELETE` | `/rounds/{id}` | 204; in-flight side effects keep running |
//!
//! Rounds are never persisted. A round belongs to the owner that started it;
//! any other owner gets 404. A round is dropped from the registry once it
//! completes, and starting a round drops the owner's previous one, so every
//! owner holds at most one live round.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex, PoisonError},
};

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tend_core::{checkin::CheckInType, store::CircleStore};
use tend_engine::{Decision, EngineState, ProgressionController};
use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

use crate::{AppState, error::ApiError, owner::Owner};

// ─── Registry ─────────────────────────────────────────────────────────────────

type Round<S> = Arc<AsyncMutex<ProgressionController<S>>>;

/// Live rounds keyed by round id, at most one per owner.
///
/// Each controller sits behind its own async mutex, so two decisions for the
/// same round run one after the other.
pub struct RoundRegistry<S> {
  rounds: Mutex<HashMap<Uuid, (Uuid, Round<S>)>>,
}

impl<S> Default for RoundRegistry<S> {
  fn default() -> Self { Self { rounds: Mutex::new(HashMap::new()) } }
}

impl<S> RoundRegistry<S> {
  /// Register `controller` as `owner`'s live round, replacing any earlier one.
  fn insert(&self, owner: Uuid, controller: ProgressionController<S>) -> Uuid {
    let id = Uuid::new_v4();
    let mut rounds = self.rounds.lock().unwrap_or_else(PoisonError::into_inner);
    rounds.retain(|_, (o, _)| *o != owner);
    rounds.insert(id, (owner, Arc::new(AsyncMutex::new(controller))));
    id
  }

  fn get(&self, owner: Uuid, id: Uuid) -> Result<Round<S>, ApiError> {
    self
      .rounds
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .get(&id)
      .filter(|(o, _)| *o == owner)
      .map(|(_, round)| Arc::clone(round))
      .ok_or_else(|| ApiError::NotFound(format!("round {id} not found")))
  }

  fn remove(&self, owner: Uuid, id: Uuid) -> Result<(), ApiError> {
    let mut rounds = self.rounds.lock().unwrap_or_else(PoisonError::into_inner);
    match rounds.get(&id) {
      Some((o, _)) if *o == owner => {
        rounds.remove(&id);
        Ok(())
      }
      _ => Err(ApiError::NotFound(format!("round {id} not found"))),
    }
  }

  /// Drop round `id` if `next` is terminal.
  fn release_if_completed(&self, owner: Uuid, id: Uuid, next: &EngineState) {
    if matches!(next, EngineState::Completed { .. }) && self.remove(owner, id).is_ok() {
      tracing::debug!(%owner, round_id = %id, "round completed, released");
    }
  }

  pub fn len(&self) -> usize {
    self.rounds.lock().unwrap_or_else(PoisonError::into_inner).len()
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

// ─── Views ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RoundView {
  pub round_id: Option<Uuid>,
  pub state:    EngineState,
}

#[derive(Debug, Deserialize)]
pub struct CheckInBody {
  #[serde(rename = "type")]
  pub kind: CheckInType,
  pub note: Option<String>,
}

// ─── Handlers ─────────────────────────────────────────────────────────────────

/// `POST /rounds`
pub async fn start<S>(
  State(state): State<AppState<S>>,
  Owner(owner): Owner,
) -> Result<impl IntoResponse, ApiError>
where
  S: CircleStore + 'static,
{
  let controller = state.engine.start_round(owner).await?;
  let round_state = controller.state();

  if round_state == EngineState::Empty {
    let view = RoundView { round_id: None, state: round_state };
    return Ok((StatusCode::OK, Json(view)));
  }

  let round_id = state.rounds.insert(owner, controller);
  tracing::debug!(%owner, %round_id, "round registered");
  Ok((StatusCode::CREATED, Json(RoundView { round_id: Some(round_id), state: round_state })))
}

/// `GET /rounds/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Owner(owner): Owner,
  Path(id): Path<Uuid>,
) -> Result<Json<RoundView>, ApiError>
where
  S: CircleStore + 'static,
{
  let round = state.rounds.get(owner, id)?;
  let round_state = round.lock().await.state();
  Ok(Json(RoundView { round_id: Some(id), state: round_state }))
}

/// `POST /rounds/{id}/check-in`: body: `{"type":"pinged","note":"..."}`
pub async fn check_in<S>(
  State(state): State<AppState<S>>,
  Owner(owner): Owner,
  Path(id): Path<Uuid>,
  body: Result<Json<CheckInBody>, JsonRejection>,
) -> Result<Json<RoundView>, ApiError>
where
  S: CircleStore + 'static,
{
  let Json(body) = body?;
  let round = state.rounds.get(owner, id)?;
  let mut controller = round.lock().await;
  let next = controller
    .check_in(Decision::new(body.kind, body.note.as_deref()))
    .await?;
  state.rounds.release_if_completed(owner, id, &next);
  Ok(Json(RoundView { round_id: Some(id), state: next }))
}

/// `POST /rounds/{id}/skip`
pub async fn skip<S>(
  State(state): State<AppState<S>>,
  Owner(owner): Owner,
  Path(id): Path<Uuid>,
) -> Result<Json<RoundView>, ApiError>
where
  S: CircleStore + 'static,
{
  let round = state.rounds.get(owner, id)?;
  let next = round.lock().await.skip()?;
  state.rounds.release_if_completed(owner, id, &next);
  Ok(Json(RoundView { round_id: Some(id), state: next }))
}

/// `DELETE /rounds/{id}`
pub async fn abandon<S>(
  State(state): State<AppState<S>>,
  Owner(owner): Owner,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: CircleStore + 'static,
{
  state.rounds.remove(owner, id)?;
  tracing::debug!(%owner, round_id = %id, "round abandoned");
  Ok(StatusCode::NO_CONTENT)
}
