//! Analytics lane: append one event row for the current session.

use std::sync::Arc;

use tend_core::{analytics::NewAnalyticsEvent, store::CircleStore};

use super::Delivery;

pub struct AnalyticsLane<S> {
  store:   Arc<S>,
  enabled: bool,
}

impl<S: CircleStore> AnalyticsLane<S> {
  pub fn new(store: Arc<S>, enabled: bool) -> Self { Self { store, enabled } }

  pub fn is_enabled(&self) -> bool { self.enabled }

  /// Write one event, already keyed to its session owner.
  pub async fn record(&self, input: NewAnalyticsEvent) -> Delivery {
    if !self.enabled {
      return Delivery::Skipped("analytics disabled");
    }
    match self.store.record_analytics_event(input).await {
      Ok(_) => Delivery::Sent,
      Err(e) => Delivery::Failed(e.to_string()),
    }
  }
}
