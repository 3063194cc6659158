//! Handlers for dreams and gratitude sparks.
//!
//! Neither is stored here: the request is accepted, then the engine echoes
//! and reports it in the background.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/dreams` | Body: [`DreamBody`]; returns 202 |
//! | `POST` | `/sparks` | Body: [`SparkBody`]; returns 202 |

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
};
use serde::Deserialize;
use tend_core::store::CircleStore;

use crate::{AppState, error::ApiError, owner::Owner};

#[derive(Debug, Deserialize)]
pub struct DreamBody {
  pub text:   String,
  /// `false` when an existing dream was edited.
  #[serde(default = "default_true")]
  pub is_new: bool,
}

fn default_true() -> bool { true }

#[derive(Debug, Deserialize)]
pub struct SparkBody {
  pub text: String,
}

/// `POST /dreams`
pub async fn dream<S>(
  State(state): State<AppState<S>>,
  Owner(owner): Owner,
  body: Result<Json<DreamBody>, JsonRejection>,
) -> Result<StatusCode, ApiError>
where
  S: CircleStore + 'static,
{
  let Json(body) = body?;
  let text = non_blank(&body.text, "dream")?;
  state.engine.dream_saved(owner, text, body.is_new);
  Ok(StatusCode::ACCEPTED)
}

/// `POST /sparks`
pub async fn spark<S>(
  State(state): State<AppState<S>>,
  Owner(owner): Owner,
  body: Result<Json<SparkBody>, JsonRejection>,
) -> Result<StatusCode, ApiError>
where
  S: CircleStore + 'static,
{
  let Json(body) = body?;
  let text = non_blank(&body.text, "spark")?;
  state.engine.spark_saved(owner, text);
  Ok(StatusCode::ACCEPTED)
}

fn non_blank(text: &str, what: &str) -> Result<String, ApiError> {
  let trimmed = text.trim();
  if trimmed.is_empty() {
    return Err(ApiError::BadRequest(format!("{what} text must not be blank")));
  }
  Ok(trimmed.to_owned())
}
