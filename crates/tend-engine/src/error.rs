//! Errors that cross the engine boundary.
//!
//! Only blocking persistence failures and state-machine misuse surface here.
//! Side-effect failures are absorbed by the dispatcher and echo generator.

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum EngineError {
  /// The roster could not be read; no round was started.
  #[error("could not load the roster: {0}")]
  RosterUnavailable(#[source] BoxError),

  /// The check-in write failed; the cursor did not move.
  #[error("check-in was not saved: {0}")]
  CheckInNotSaved(#[source] BoxError),

  /// An action was invoked outside the state it is valid in. This points at
  /// an integration bug upstream, not a user-facing condition.
  #[error("`{action}` is not valid while the round is {state}")]
  InvalidState {
    action: &'static str,
    state:  &'static str,
  },

  #[error("failed to build the webhook client: {0}")]
  HttpClient(#[from] reqwest::Error),
}

impl EngineError {
  /// Whether the caller should offer to retry the exact same action.
  pub fn is_retryable(&self) -> bool {
    matches!(self, Self::RosterUnavailable(_) | Self::CheckInNotSaved(_))
  }
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
