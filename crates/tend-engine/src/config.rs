//! Static engine configuration, injected at construction.

use std::time::Duration;

use serde::Deserialize;

/// Default abort deadline for a webhook POST.
pub const DEFAULT_WEBHOOK_TIMEOUT_MS: u64 = 5_000;

/// Switches for the side-effect lanes.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
  /// When `false`, no analytics event is written (and none is mirrored).
  #[serde(default = "default_true")]
  pub analytics_enabled: bool,
  #[serde(default)]
  pub webhook:           WebhookConfig,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self { analytics_enabled: true, webhook: WebhookConfig::default() }
  }
}

/// The single outbound automation endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
  #[serde(default)]
  pub enabled:    bool,
  pub url:        Option<String>,
  #[serde(default = "default_timeout_ms")]
  pub timeout_ms: u64,
}

impl Default for WebhookConfig {
  fn default() -> Self {
    Self { enabled: false, url: None, timeout_ms: DEFAULT_WEBHOOK_TIMEOUT_MS }
  }
}

impl WebhookConfig {
  /// An enabled config pointing at `url` with the default timeout.
  pub fn enabled(url: impl Into<String>) -> Self {
    Self { enabled: true, url: Some(url.into()), ..Self::default() }
  }

  /// The endpoint to post to, or `None` when the lane is switched off.
  pub fn target(&self) -> Option<&str> {
    if !self.enabled {
      return None;
    }
    self.url.as_deref().filter(|u| !u.trim().is_empty())
  }

  pub fn timeout(&self) -> Duration { Duration::from_millis(self.timeout_ms) }
}

fn default_true() -> bool { true }

fn default_timeout_ms() -> u64 { DEFAULT_WEBHOOK_TIMEOUT_MS }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_config_uses_defaults() {
    let cfg: EngineConfig = serde_json::from_str("{}").unwrap();
    assert!(cfg.analytics_enabled);
    assert!(cfg.webhook.target().is_none());
    assert_eq!(cfg.webhook.timeout(), Duration::from_secs(5));
  }

  #[test]
  fn webhook_needs_both_flag_and_url() {
    let mut cfg = WebhookConfig::enabled("http://example.test/hook");
    assert_eq!(cfg.target(), Some("http://example.test/hook"));

    cfg.enabled = false;
    assert!(cfg.target().is_none());

    cfg.enabled = true;
    cfg.url = Some("  ".into());
    assert!(cfg.target().is_none());
  }
}
