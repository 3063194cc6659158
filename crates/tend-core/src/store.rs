//! The `CircleStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `tend-store-sqlite`).
//! Higher layers (`tend-engine`, `tend-api`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  analytics::{AnalyticsEvent, NewAnalyticsEvent},
  checkin::{CheckInEvent, NewCheckIn},
  echo::{EchoRecord, NewEcho},
  profile::Profile,
  relationship::{NewRelationship, RelationshipRecord},
};

/// Abstraction over a Tend storage backend.
///
/// Check-ins, echoes and analytics events are append-only. Relationships are
/// only ever added here; editing them belongs to the circle editor.
///
/// All methods return `Send` futures so the trait can be used from spawned
/// tasks on a multi-threaded tokio runtime.
pub trait CircleStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Roster ────────────────────────────────────────────────────────────

  /// Persist a new relationship. `id` and `created_at` are store-assigned.
  fn add_relationship(
    &self,
    input: NewRelationship,
  ) -> impl Future<Output = Result<RelationshipRecord, Self::Error>> + Send + '_;

  /// All relationships for `owner`, ascending by `created_at`.
  fn list_relationships(
    &self,
    owner: Uuid,
  ) -> impl Future<Output = Result<Vec<RelationshipRecord>, Self::Error>> + Send + '_;

  /// Retrieve a relationship by id. Returns `None` if not found.
  fn get_relationship(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<RelationshipRecord>, Self::Error>> + Send + '_;

  // ── Check-ins ─────────────────────────────────────────────────────────

  /// Append one check-in and return the persisted event.
  fn record_checkin(
    &self,
    input: NewCheckIn,
  ) -> impl Future<Output = Result<CheckInEvent, Self::Error>> + Send + '_;

  /// The most recent check-ins for one relationship, newest first.
  fn recent_checkins(
    &self,
    owner: Uuid,
    relationship_id: Uuid,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<CheckInEvent>, Self::Error>> + Send + '_;

  // ── Profile ───────────────────────────────────────────────────────────

  /// The stored profile, or `None` if the owner never changed a preference.
  fn get_profile(
    &self,
    owner: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// Create or update the owner's echo toggle.
  fn set_echoes_enabled(
    &self,
    owner: Uuid,
    enabled: bool,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  // ── Echoes ────────────────────────────────────────────────────────────

  fn record_echo(
    &self,
    input: NewEcho,
  ) -> impl Future<Output = Result<EchoRecord, Self::Error>> + Send + '_;

  /// The most recent echoes for `owner`, newest first.
  fn recent_echoes(
    &self,
    owner: Uuid,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<EchoRecord>, Self::Error>> + Send + '_;

  // ── Analytics ─────────────────────────────────────────────────────────

  fn record_analytics_event(
    &self,
    input: NewAnalyticsEvent,
  ) -> impl Future<Output = Result<AnalyticsEvent, Self::Error>> + Send + '_;

  /// Every analytics event for `owner`, oldest first.
  fn list_analytics_events(
    &self,
    owner: Uuid,
  ) -> impl Future<Output = Result<Vec<AnalyticsEvent>, Self::Error>> + Send + '_;
}
