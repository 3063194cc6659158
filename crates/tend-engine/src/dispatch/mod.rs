//! Best-effort side effects: analytics logging and webhook mirroring.
//!
//! Both lanes report a [`Delivery`] that only the dispatcher looks at, to log
//! it. Callers get nothing back and are expected to run these calls on a
//! background task.

pub mod analytics;
pub mod webhook;

use std::sync::{
  Arc,
  atomic::{AtomicBool, Ordering},
};

use chrono::Utc;
use serde_json::{Map, Value, json};
use tend_core::{
  analytics::{NewAnalyticsEvent, names},
  checkin::CheckInEvent,
  echo::EchoRecord,
  relationship::{RelationshipRecord, RelationshipType},
  store::CircleStore,
};
use uuid::Uuid;

use crate::{EngineConfig, RoundSummary};

use self::{analytics::AnalyticsLane, webhook::WebhookLane};

/// Result of one lane call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
  Sent,
  Skipped(&'static str),
  Failed(String),
}

/// Fans significant events out to the analytics and webhook lanes.
pub struct SideEffectDispatcher<S> {
  analytics:       AnalyticsLane<S>,
  webhook:         WebhookLane,
  session_tracked: AtomicBool,
}

impl<S: CircleStore> SideEffectDispatcher<S> {
  pub fn new(store: Arc<S>, config: &EngineConfig) -> reqwest::Result<Self> {
    Ok(Self {
      analytics:       AnalyticsLane::new(store, config.analytics_enabled),
      webhook:         WebhookLane::new(config.webhook.clone())?,
      session_tracked: AtomicBool::new(false),
    })
  }

  // ── Lanes ─────────────────────────────────────────────────────────────

  /// Log an analytics event and, once it is written, mirror it to the
  /// webhook as `class = "analytics"`.
  ///
  /// `metadata` must be a JSON object (or null). `session_start` is
  /// forwarded only the first time this dispatcher sees it.
  pub async fn log_event(
    &self,
    session: Option<Uuid>,
    event_name: &str,
    metadata: Value,
  ) -> Delivery {
    if !self.analytics.is_enabled() {
      return report("analytics", event_name, Delivery::Skipped("analytics disabled"));
    }
    if event_name == names::SESSION_START
      && self.session_tracked.swap(true, Ordering::SeqCst)
    {
      return report("analytics", event_name, Delivery::Skipped("session already tracked"));
    }
    let Some(owner) = session else {
      return report("analytics", event_name, Delivery::Skipped("no session"));
    };

    let input = match NewAnalyticsEvent::from_value(owner, event_name, metadata) {
      Ok(input) => input,
      Err(e) => return report("analytics", event_name, Delivery::Failed(e.to_string())),
    };
    let mirror = input.metadata.clone();
    let delivery = report("analytics", event_name, self.analytics.record(input).await);

    if delivery == Delivery::Sent {
      let mut data = Map::new();
      data.insert("user_id".into(), Value::from(owner.to_string()));
      data.extend(mirror);
      self.send_webhook("analytics", event_name, data).await;
    }
    delivery
  }

  /// Post one envelope to the webhook lane.
  pub async fn send_webhook(
    &self,
    class: &str,
    event: &str,
    data: Map<String, Value>,
  ) -> Delivery {
    let label = format!("{class}/{event}");
    report("webhook", &label, self.webhook.send(class, event, data).await)
  }

  // ── Events ────────────────────────────────────────────────────────────

  pub async fn session_start(&self, session: Option<Uuid>) {
    let metadata = json!({ "timestamp": Utc::now().to_rfc3339() });
    self.log_event(session, names::SESSION_START, metadata).await;
  }

  /// A check-in was persisted.
  pub async fn checkin_completed(
    &self,
    owner: Uuid,
    person: &RelationshipRecord,
    event: &CheckInEvent,
  ) {
    let note = event.note.as_ref().map(|n| n.as_str());
    let analytics = json!({
      "relationship_id":   person.id,
      "relationship_name": person.name,
      "relationship_type": person.relationship_type,
      "check_in_type":     event.kind,
      "has_note":          note.is_some(),
    });
    let hook = object(json!({
      "user_id":           owner,
      "relationship_id":   person.id,
      "relationship_name": person.name,
      "relationship_type": person.relationship_type,
      "check_in_type":     event.kind,
      "note":              note,
    }));

    tokio::join!(
      self.log_event(Some(owner), names::CHECKIN_COMPLETE, analytics),
      self.send_webhook("checkin", "completed", hook),
    );
  }

  /// An echo was persisted.
  pub async fn echo_generated(
    &self,
    owner: Uuid,
    echo: &EchoRecord,
    relationship_type: Option<RelationshipType>,
  ) {
    let metadata = json!({
      "source":            echo.source,
      "relationship_id":   echo.relationship_id,
      "relationship_type": relationship_type,
      "echo_text":         echo.text,
    });
    self.log_event(Some(owner), names::ECHO_GENERATED, metadata).await;
  }

  /// The walk through the roster finished.
  pub async fn round_completed(&self, owner: Uuid, summary: &RoundSummary) {
    let analytics = json!(summary);
    let mut hook = object(json!({ "user_id": owner }));
    hook.extend(object(analytics.clone()));

    tokio::join!(
      self.log_event(Some(owner), names::CHECKIN_ROUND_COMPLETE, analytics),
      self.send_webhook("checkin", "circle_completed", hook),
    );
  }

  /// The owner's circle changed; `circle_size` is the size after the change.
  pub async fn circle_updated(
    &self,
    owner: Uuid,
    person: &RelationshipRecord,
    circle_size: usize,
    action_type: &str,
  ) {
    let metadata = json!({
      "circle_size":       circle_size,
      "action_type":       action_type,
      "relationship_type": person.relationship_type,
      "relationship_id":   person.id,
    });
    self.log_event(Some(owner), names::CIRCLE_UPDATED, metadata).await;
  }

  /// A dream was created (`is_new`) or edited.
  pub async fn dream_saved(&self, owner: Uuid, text: &str, is_new: bool) {
    let hook = object(json!({
      "user_id":    owner,
      "dream_text": text,
      "has_image":  false,
      "image_type": null,
    }));
    let analytics = json!({
      "is_new":      is_new,
      "has_image":   false,
      "text_length": text.chars().count(),
      "text":        text,
    });
    let event = if is_new { "created" } else { "updated" };

    tokio::join!(
      self.send_webhook("dream", event, hook),
      self.log_event(Some(owner), names::DREAM_SAVED, analytics),
    );
  }

  /// A gratitude spark was captured.
  pub async fn spark_created(&self, owner: Uuid, text: &str) {
    let metadata = json!({
      "content_length": text.chars().count(),
      "type":           "manual_entry",
    });
    self.log_event(Some(owner), names::SPARK_CREATED, metadata).await;
  }
}

fn object(value: Value) -> Map<String, Value> {
  match value {
    Value::Object(map) => map,
    _ => Map::new(),
  }
}

/// Log a lane outcome. Failures are swallowed here.
fn report(lane: &'static str, event: &str, delivery: Delivery) -> Delivery {
  match &delivery {
    Delivery::Sent => tracing::debug!(lane, event, "side effect delivered"),
    Delivery::Skipped(reason) => tracing::debug!(lane, event, reason, "side effect skipped"),
    Delivery::Failed(reason) => {
      tracing::warn!(lane, event, %reason, "side effect failed")
    }
  }
  delivery
}
