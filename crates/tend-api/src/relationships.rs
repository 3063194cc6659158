//! Handlers for `/relationships` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/relationships` | The owner's roster, in walk order |
//! | `POST` | `/relationships` | Body: [`CreateBody`]; returns 201 and reports `circle_updated` |
//! | `GET`  | `/relationships/{id}/check-ins` | Optional `?limit=N` (default 5), newest first |

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use tend_core::{
  checkin::CheckInEvent,
  relationship::{NewRelationship, RelationshipRecord, RelationshipType},
  store::CircleStore,
};
use uuid::Uuid;

use crate::{AppState, error::ApiError, owner::Owner};

const DEFAULT_HISTORY: usize = 5;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /relationships`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Owner(owner): Owner,
) -> Result<Json<Vec<RelationshipRecord>>, ApiError>
where
  S: CircleStore + 'static,
{
  let roster = state
    .engine
    .store()
    .list_relationships(owner)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(roster))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:              String,
  pub relationship_type: RelationshipType,
  pub notes:             Option<String>,
  pub photo_ref:         Option<String>,
}

/// `POST /relationships`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Owner(owner): Owner,
  body: Result<Json<CreateBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CircleStore + 'static,
{
  let Json(body) = body?;
  let input = NewRelationship {
    notes: body.notes.filter(|n| !n.trim().is_empty()),
    photo_ref: body.photo_ref,
    ..NewRelationship::new(owner, &body.name, body.relationship_type)
      .map_err(|e| ApiError::BadRequest(e.to_string()))?
  };
  let record = state
    .engine
    .store()
    .add_relationship(input)
    .await
    .map_err(ApiError::store)?;
  state.engine.relationship_added(owner, record.clone());
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── History ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
  pub limit: Option<usize>,
}

/// `GET /relationships/{id}/check-ins[?limit=N]`
pub async fn check_ins<S>(
  State(state): State<AppState<S>>,
  Owner(owner): Owner,
  Path(id): Path<Uuid>,
  Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<CheckInEvent>>, ApiError>
where
  S: CircleStore + 'static,
{
  let store = state.engine.store();
  store
    .get_relationship(id)
    .await
    .map_err(ApiError::store)?
    .filter(|r| r.owner_id == owner)
    .ok_or_else(|| ApiError::NotFound(format!("relationship {id} not found")))?;

  let events = store
    .recent_checkins(owner, id, params.limit.unwrap_or(DEFAULT_HISTORY))
    .await
    .map_err(ApiError::store)?;
  Ok(Json(events))
}
