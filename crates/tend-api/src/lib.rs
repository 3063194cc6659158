//! JSON REST API for Tend.
//!
//! Exposes an axum [`Router`] over a [`tend_engine::Engine`]: the roster,
//! per-relationship check-in history, the echoes feed and toggle, saved
//! dreams and gratitude sparks, and in-memory check-in rounds. Every route
//! reads the acting owner from the `X-Owner-Id` header; authentication and
//! TLS are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", tend_api::api_router(engine.clone()))
//! ```

pub mod echoes;
pub mod error;
pub mod owner;
pub mod reflections;
pub mod relationships;
pub mod rounds;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use tend_core::store::CircleStore;
use tend_engine::Engine;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use owner::{OWNER_HEADER, Owner};
pub use rounds::RoundRegistry;

/// Shared state threaded through all handlers.
pub struct AppState<S> {
  pub engine: Engine<S>,
  pub rounds: Arc<RoundRegistry<S>>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { engine: self.engine.clone(), rounds: Arc::clone(&self.rounds) }
  }
}

impl<S> AppState<S> {
  pub fn new(engine: Engine<S>) -> Self {
    Self { engine, rounds: Arc::new(RoundRegistry::default()) }
  }
}

/// Build a fully-materialised API router over `engine`.
pub fn api_router<S>(engine: Engine<S>) -> Router<()>
where
  S: CircleStore + 'static,
{
  router(AppState::new(engine))
}

/// Build the router from an existing [`AppState`], e.g. to share a round
/// registry with the caller.
pub fn router<S>(state: AppState<S>) -> Router<()>
where
  S: CircleStore + 'static,
{
  Router::new()
    // Roster
    .route(
      "/relationships",
      get(relationships::list::<S>).post(relationships::create::<S>),
    )
    .route("/relationships/{id}/check-ins", get(relationships::check_ins::<S>))
    // Echoes
    .route("/echoes", get(echoes::feed::<S>))
    .route("/profile", get(echoes::profile::<S>))
    .route("/profile/echoes", put(echoes::toggle::<S>))
    // Reflections
    .route("/dreams", post(reflections::dream::<S>))
    .route("/sparks", post(reflections::spark::<S>))
    // Rounds
    .route("/rounds", post(rounds::start::<S>))
    .route(
      "/rounds/{id}",
      get(rounds::get_one::<S>).delete(rounds::abandon::<S>),
    )
    .route("/rounds/{id}/check-in", post(rounds::check_in::<S>))
    .route("/rounds/{id}/skip", post(rounds::skip::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
