//! Handlers for the echoes feed and the echo toggle.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/echoes` | Optional `?limit=N` (default 7, max 20); empty when echoes are off |
//! | `GET`  | `/profile` | Stored profile, or the defaults |
//! | `PUT`  | `/profile/echoes` | Body: `{"enabled": bool}` |

use axum::{
  Json,
  extract::{Query, State, rejection::JsonRejection},
};
use serde::Deserialize;
use tend_core::{echo::EchoRecord, profile::Profile, store::CircleStore};

use crate::{AppState, error::ApiError, owner::Owner};

const DEFAULT_FEED: usize = 7;
const MAX_FEED: usize = 20;

#[derive(Debug, Deserialize)]
pub struct FeedParams {
  pub limit: Option<usize>,
}

/// `GET /echoes[?limit=N]`
pub async fn feed<S>(
  State(state): State<AppState<S>>,
  Owner(owner): Owner,
  Query(params): Query<FeedParams>,
) -> Result<Json<Vec<EchoRecord>>, ApiError>
where
  S: CircleStore + 'static,
{
  let store = state.engine.store();
  let enabled = store
    .get_profile(owner)
    .await
    .map_err(ApiError::store)?
    .is_none_or(|p| p.echoes_enabled);
  if !enabled {
    return Ok(Json(Vec::new()));
  }

  let limit = params.limit.unwrap_or(DEFAULT_FEED).min(MAX_FEED);
  let echoes = store.recent_echoes(owner, limit).await.map_err(ApiError::store)?;
  Ok(Json(echoes))
}

/// `GET /profile`
pub async fn profile<S>(
  State(state): State<AppState<S>>,
  Owner(owner): Owner,
) -> Result<Json<Profile>, ApiError>
where
  S: CircleStore + 'static,
{
  let profile = state
    .engine
    .store()
    .get_profile(owner)
    .await
    .map_err(ApiError::store)?
    .unwrap_or_else(|| Profile::default_for(owner));
  Ok(Json(profile))
}

#[derive(Debug, Deserialize)]
pub struct ToggleBody {
  pub enabled: bool,
}

/// `PUT /profile/echoes`
pub async fn toggle<S>(
  State(state): State<AppState<S>>,
  Owner(owner): Owner,
  body: Result<Json<ToggleBody>, JsonRejection>,
) -> Result<Json<Profile>, ApiError>
where
  S: CircleStore + 'static,
{
  let Json(body) = body?;
  let profile = state
    .engine
    .store()
    .set_echoes_enabled(owner, body.enabled)
    .await
    .map_err(ApiError::store)?;
  tracing::debug!(%owner, enabled = body.enabled, "echo preference changed");
  Ok(Json(profile))
}
