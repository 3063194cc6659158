//! Integration tests for `SqliteStore` against an in-memory database.

use serde_json::json;
use tend_core::{
  analytics::NewAnalyticsEvent,
  checkin::{CheckInType, NewCheckIn, Note},
  echo::{DEFAULT_IMPORTANCE, EchoSource, NewEcho},
  relationship::{NewRelationship, RelationshipRecord, RelationshipType},
  store::CircleStore,
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn add_person(
  s: &SqliteStore,
  owner: Uuid,
  name: &str,
  kind: RelationshipType,
) -> RelationshipRecord {
  s.add_relationship(NewRelationship::new(owner, name, kind).unwrap())
    .await
    .unwrap()
}

fn checkin(owner: Uuid, rel: Uuid, kind: CheckInType, note: Option<&str>) -> NewCheckIn {
  NewCheckIn {
    owner_id:        owner,
    relationship_id: rel,
    kind,
    note:            Note::from_optional(note),
  }
}

// ─── Roster ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_relationship() {
  let s = store().await;
  let owner = Uuid::new_v4();

  let mut input = NewRelationship::new(owner, "Ada", RelationshipType::Mentor).unwrap();
  input.notes = Some("met at the workshop".into());
  input.photo_ref = Some("circle-photos/ada.jpg".into());
  let added = s.add_relationship(input).await.unwrap();

  let fetched = s.get_relationship(added.id).await.unwrap().unwrap();
  assert_eq!(fetched, added);
  assert_eq!(fetched.relationship_type, RelationshipType::Mentor);
  assert_eq!(fetched.notes.as_deref(), Some("met at the workshop"));
}

#[tokio::test]
async fn get_relationship_missing_returns_none() {
  let s = store().await;
  assert!(s.get_relationship(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn roster_is_ordered_by_creation_and_scoped_to_owner() {
  let s = store().await;
  let owner = Uuid::new_v4();
  let other = Uuid::new_v4();

  let a = add_person(&s, owner, "A", RelationshipType::Partner).await;
  add_person(&s, other, "Stranger", RelationshipType::Friend).await;
  let b = add_person(&s, owner, "B", RelationshipType::Family).await;
  let c = add_person(&s, owner, "C", RelationshipType::Colleague).await;

  let roster = s.list_relationships(owner).await.unwrap();
  let ids: Vec<_> = roster.iter().map(|r| r.id).collect();
  assert_eq!(ids, vec![a.id, b.id, c.id]);
}

#[tokio::test]
async fn empty_roster_for_unknown_owner() {
  let s = store().await;
  assert!(s.list_relationships(Uuid::new_v4()).await.unwrap().is_empty());
}

// ─── Check-ins ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_checkin_and_read_back_newest_first() {
  let s = store().await;
  let owner = Uuid::new_v4();
  let a = add_person(&s, owner, "A", RelationshipType::Friend).await;

  let first = s
    .record_checkin(checkin(owner, a.id, CheckInType::Pinged, Some("hi")))
    .await
    .unwrap();
  let second = s
    .record_checkin(checkin(owner, a.id, CheckInType::Thought, None))
    .await
    .unwrap();

  let recent = s.recent_checkins(owner, a.id, 5).await.unwrap();
  assert_eq!(recent.len(), 2);
  assert_eq!(recent[0], second);
  assert_eq!(recent[1], first);
  assert_eq!(recent[1].note.as_ref().map(Note::as_str), Some("hi"));
  assert!(recent[0].note.is_none());
}

#[tokio::test]
async fn recent_checkins_respects_limit() {
  let s = store().await;
  let owner = Uuid::new_v4();
  let a = add_person(&s, owner, "A", RelationshipType::Friend).await;

  for _ in 0..7 {
    s.record_checkin(checkin(owner, a.id, CheckInType::Pinged, None))
      .await
      .unwrap();
  }

  assert_eq!(s.recent_checkins(owner, a.id, 5).await.unwrap().len(), 5);
}

#[tokio::test]
async fn checkin_for_unknown_relationship_is_rejected() {
  let s = store().await;
  let owner = Uuid::new_v4();
  let missing = Uuid::new_v4();

  let err = s
    .record_checkin(checkin(owner, missing, CheckInType::Pinged, None))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::RelationshipNotFound(id) if id == missing));
}

#[tokio::test]
async fn writes_against_another_owners_relationship_are_rejected() {
  let s = store().await;
  let owner = Uuid::new_v4();
  let intruder = Uuid::new_v4();
  let a = add_person(&s, owner, "A", RelationshipType::Friend).await;

  let err = s
    .record_checkin(checkin(intruder, a.id, CheckInType::Thought, None))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::RelationshipNotFound(id) if id == a.id));

  let err = s
    .record_echo(NewEcho {
      owner_id:         intruder,
      relationship_id:  Some(a.id),
      source:           EchoSource::Checkin,
      text:             "You held someone in your thoughts. That's care.".into(),
      importance_score: DEFAULT_IMPORTANCE,
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::RelationshipNotFound(_)));

  assert!(s.recent_checkins(owner, a.id, 5).await.unwrap().is_empty());
  assert!(s.recent_echoes(intruder, 5).await.unwrap().is_empty());
}

#[tokio::test]
async fn long_note_is_stored_truncated() {
  let s = store().await;
  let owner = Uuid::new_v4();
  let a = add_person(&s, owner, "A", RelationshipType::Friend).await;
  let raw = "y".repeat(300);

  s.record_checkin(checkin(owner, a.id, CheckInType::Thought, Some(&raw)))
    .await
    .unwrap();

  let stored = s.recent_checkins(owner, a.id, 1).await.unwrap();
  let note = stored[0].note.as_ref().unwrap();
  assert_eq!(note.as_str().chars().count(), 200);
}

// ─── Profile ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn profile_absent_until_written() {
  let s = store().await;
  assert!(s.get_profile(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn set_echoes_enabled_upserts() {
  let s = store().await;
  let owner = Uuid::new_v4();

  s.set_echoes_enabled(owner, false).await.unwrap();
  assert!(!s.get_profile(owner).await.unwrap().unwrap().echoes_enabled);

  s.set_echoes_enabled(owner, true).await.unwrap();
  let profile = s.get_profile(owner).await.unwrap().unwrap();
  assert!(profile.echoes_enabled);
  assert!(profile.updated_at.is_some());
}

// ─── Echoes ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_echo_with_and_without_relationship() {
  let s = store().await;
  let owner = Uuid::new_v4();
  let a = add_person(&s, owner, "A", RelationshipType::Family).await;

  let with_rel = s
    .record_echo(NewEcho {
      owner_id:         owner,
      relationship_id:  Some(a.id),
      source:           EchoSource::Checkin,
      text:             "You reached out to A today. That counts.".into(),
      importance_score: DEFAULT_IMPORTANCE,
    })
    .await
    .unwrap();
  let without = s
    .record_echo(NewEcho {
      owner_id:         owner,
      relationship_id:  None,
      source:           EchoSource::Dream,
      text:             "You clarified your vision.".into(),
      importance_score: DEFAULT_IMPORTANCE,
    })
    .await
    .unwrap();

  let feed = s.recent_echoes(owner, 7).await.unwrap();
  assert_eq!(feed, vec![without, with_rel]);
  assert_eq!(feed[1].importance_score, 1);
}

// ─── Analytics ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn analytics_metadata_roundtrip() {
  let s = store().await;
  let owner = Uuid::new_v4();

  let input = NewAnalyticsEvent::from_value(
    owner,
    "checkin_round_complete",
    json!({ "circle_size": 2, "completed_fully": false }),
  )
  .unwrap();
  s.record_analytics_event(input).await.unwrap();

  let events = s.list_analytics_events(owner).await.unwrap();
  assert_eq!(events.len(), 1);
  assert_eq!(events[0].event_name, "checkin_round_complete");
  assert_eq!(events[0].metadata["circle_size"], json!(2));
  assert_eq!(events[0].metadata["completed_fully"], json!(false));
}

#[test]
fn analytics_metadata_must_be_an_object() {
  assert!(NewAnalyticsEvent::from_value(Uuid::new_v4(), "x", json!([1, 2])).is_err());
  assert!(
    NewAnalyticsEvent::from_value(Uuid::new_v4(), "x", serde_json::Value::Null)
      .unwrap()
      .metadata
      .is_empty()
  );
}
