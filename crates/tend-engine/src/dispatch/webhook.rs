//! Webhook lane: POST a JSON envelope to the configured endpoint.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde_json::{Map, Value};

use super::Delivery;
use crate::config::WebhookConfig;

pub struct WebhookLane {
  client: Client,
  config: WebhookConfig,
}

impl WebhookLane {
  pub fn new(config: WebhookConfig) -> reqwest::Result<Self> {
    // The per-call deadline is applied in `send`; the client itself has none.
    let client = Client::builder().build()?;
    Ok(Self { client, config })
  }

  /// Post `{class, event, timestamp, ...data}`. Aborted after the configured
  /// timeout; never retried.
  pub async fn send(&self, class: &str, event: &str, data: Map<String, Value>) -> Delivery {
    let Some(url) = self.config.target() else {
      return Delivery::Skipped("webhook disabled");
    };

    let body = envelope(class, event, Utc::now(), data);
    let request = self.client.post(url).json(&body).send();

    match tokio::time::timeout(self.config.timeout(), request).await {
      Err(_) => Delivery::Failed(format!("timed out after {}ms", self.config.timeout_ms)),
      Ok(Err(e)) => Delivery::Failed(e.to_string()),
      Ok(Ok(resp)) if !resp.status().is_success() => {
        Delivery::Failed(format!("endpoint answered {}", resp.status()))
      }
      Ok(Ok(_)) => Delivery::Sent,
    }
  }
}

/// Build the wire envelope. The three header fields always win over
/// same-named keys in `data`.
pub fn envelope(
  class: &str,
  event: &str,
  at: DateTime<Utc>,
  data: Map<String, Value>,
) -> Value {
  let mut body = Map::new();
  body.insert("class".into(), Value::from(class));
  body.insert("event".into(), Value::from(event));
  body.insert(
    "timestamp".into(),
    Value::from(at.to_rfc3339_opts(SecondsFormat::Millis, true)),
  );
  for (key, value) in data {
    body.entry(key).or_insert(value);
  }
  Value::Object(body)
}
