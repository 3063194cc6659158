//! Round-level telemetry, computed once when a round completes.

use std::{sync::Arc, time::Instant};

use serde::{Deserialize, Serialize};
use tend_core::store::CircleStore;
use uuid::Uuid;

use crate::{BackgroundTasks, ProgressionState, SideEffectDispatcher};

/// Metrics for one finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
  pub circle_size:        usize,
  pub completion_time_ms: u64,
  /// `true` iff nobody was skipped.
  pub completed_fully:    bool,
  pub skipped_count:      usize,
}

impl RoundSummary {
  /// Pure computation over the final progression state.
  pub fn from_progress(progress: &ProgressionState, now: Instant) -> Self {
    let elapsed = now.saturating_duration_since(progress.round_start);
    Self {
      circle_size:        progress.roster.len(),
      completion_time_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
      completed_fully:    progress.skipped_count == 0,
      skipped_count:      progress.skipped_count,
    }
  }
}

/// Summarises a finished round and hands the summary to the dispatcher.
pub struct CompletionAggregator<S> {
  dispatcher: Arc<SideEffectDispatcher<S>>,
  tasks:      BackgroundTasks,
}

impl<S: CircleStore + 'static> CompletionAggregator<S> {
  pub fn new(dispatcher: Arc<SideEffectDispatcher<S>>, tasks: BackgroundTasks) -> Self {
    Self { dispatcher, tasks }
  }

  /// Compute the summary and dispatch it in the background. The summary is
  /// returned whether or not dispatch later succeeds.
  pub fn complete(&self, owner: Uuid, progress: &ProgressionState) -> RoundSummary {
    let summary = RoundSummary::from_progress(progress, Instant::now());
    tracing::info!(
      %owner,
      circle_size = summary.circle_size,
      skipped = summary.skipped_count,
      elapsed_ms = summary.completion_time_ms,
      "check-in round completed"
    );

    let dispatcher = Arc::clone(&self.dispatcher);
    self.tasks.spawn(async move {
      dispatcher.round_completed(owner, &summary).await;
    });
    summary
  }
}
