//! [`SqliteStore`]: the SQLite implementation of [`CircleStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use tend_core::{
  analytics::{AnalyticsEvent, NewAnalyticsEvent},
  checkin::{CheckInEvent, NewCheckIn},
  echo::{EchoRecord, NewEcho},
  profile::Profile,
  relationship::{NewRelationship, RelationshipRecord},
  store::CircleStore,
};

use crate::{
  encode::{
    RawAnalyticsEvent, RawCheckIn, RawEcho, RawProfile, RawRelationship,
    encode_dt, encode_uuid, now,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Tend circle store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Whether `owner` has a relationship row with this id.
  async fn relationship_exists(&self, owner: Uuid, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let owner_str = encode_uuid(owner);
    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM relationships WHERE relationship_id = ?1 AND owner_id = ?2",
              rusqlite::params![id_str, owner_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }
}

// ─── CircleStore impl ────────────────────────────────────────────────────────

impl CircleStore for SqliteStore {
  type Error = Error;

  // ── Roster ────────────────────────────────────────────────────────────────

  async fn add_relationship(&self, input: NewRelationship) -> Result<RelationshipRecord> {
    let record = RelationshipRecord {
      id:                Uuid::new_v4(),
      owner_id:          input.owner_id,
      name:              input.name,
      relationship_type: input.relationship_type,
      notes:             input.notes,
      photo_ref:         input.photo_ref,
      created_at:        now(),
    };

    let id_str    = encode_uuid(record.id);
    let owner_str = encode_uuid(record.owner_id);
    let name      = record.name.clone();
    let type_str  = record.relationship_type.as_str();
    let notes     = record.notes.clone();
    let photo_ref = record.photo_ref.clone();
    let at_str    = encode_dt(record.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO relationships (
             relationship_id, owner_id, name, relationship_type,
             notes, photo_ref, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![id_str, owner_str, name, type_str, notes, photo_ref, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }

  async fn list_relationships(&self, owner: Uuid) -> Result<Vec<RelationshipRecord>> {
    let owner_str = encode_uuid(owner);

    let raws: Vec<RawRelationship> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM relationships
           WHERE owner_id = ?1
           ORDER BY created_at ASC, rowid ASC",
          RawRelationship::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str], RawRelationship::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRelationship::into_record).collect()
  }

  async fn get_relationship(&self, id: Uuid) -> Result<Option<RelationshipRecord>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawRelationship> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {} FROM relationships WHERE relationship_id = ?1",
                RawRelationship::COLUMNS
              ),
              rusqlite::params![id_str],
              RawRelationship::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRelationship::into_record).transpose()
  }

  // ── Check-ins ─────────────────────────────────────────────────────────────

  async fn record_checkin(&self, input: NewCheckIn) -> Result<CheckInEvent> {
    if !self
      .relationship_exists(input.owner_id, input.relationship_id)
      .await?
    {
      return Err(Error::RelationshipNotFound(input.relationship_id));
    }

    let event = CheckInEvent {
      id:              Uuid::new_v4(),
      owner_id:        input.owner_id,
      relationship_id: input.relationship_id,
      kind:            input.kind,
      note:            input.note,
      created_at:      now(),
    };

    let id_str    = encode_uuid(event.id);
    let owner_str = encode_uuid(event.owner_id);
    let rel_str   = encode_uuid(event.relationship_id);
    let type_str  = event.kind.as_str();
    let note      = event.note.as_ref().map(|n| n.as_str().to_owned());
    let at_str    = encode_dt(event.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO checkins (checkin_id, owner_id, relationship_id, type, note, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, owner_str, rel_str, type_str, note, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(event)
  }

  async fn recent_checkins(
    &self,
    owner:           Uuid,
    relationship_id: Uuid,
    limit:           usize,
  ) -> Result<Vec<CheckInEvent>> {
    let owner_str = encode_uuid(owner);
    let rel_str   = encode_uuid(relationship_id);
    let limit_val = limit as i64;

    let raws: Vec<RawCheckIn> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM checkins
           WHERE owner_id = ?1 AND relationship_id = ?2
           ORDER BY created_at DESC, rowid DESC
           LIMIT ?3",
          RawCheckIn::COLUMNS
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![owner_str, rel_str, limit_val],
            RawCheckIn::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCheckIn::into_event).collect()
  }

  // ── Profile ───────────────────────────────────────────────────────────────

  async fn get_profile(&self, owner: Uuid) -> Result<Option<Profile>> {
    let owner_str = encode_uuid(owner);

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT owner_id, echoes_enabled, updated_at FROM profiles WHERE owner_id = ?1",
              rusqlite::params![owner_str],
              |row| {
                Ok(RawProfile {
                  owner_id:       row.get(0)?,
                  echoes_enabled: row.get(1)?,
                  updated_at:     row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }

  async fn set_echoes_enabled(&self, owner: Uuid, enabled: bool) -> Result<Profile> {
    let profile = Profile {
      owner_id:       owner,
      echoes_enabled: enabled,
      updated_at:     Some(now()),
    };

    let owner_str = encode_uuid(owner);
    let at_str    = profile.updated_at.map(encode_dt);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO profiles (owner_id, echoes_enabled, updated_at)
           VALUES (?1, ?2, ?3)
           ON CONFLICT (owner_id) DO UPDATE SET
             echoes_enabled = excluded.echoes_enabled,
             updated_at     = excluded.updated_at",
          rusqlite::params![owner_str, enabled, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(profile)
  }

  // ── Echoes ────────────────────────────────────────────────────────────────

  async fn record_echo(&self, input: NewEcho) -> Result<EchoRecord> {
    if let Some(rel) = input.relationship_id
      && !self.relationship_exists(input.owner_id, rel).await?
    {
      return Err(Error::RelationshipNotFound(rel));
    }

    let record = EchoRecord {
      id:               Uuid::new_v4(),
      owner_id:         input.owner_id,
      relationship_id:  input.relationship_id,
      source:           input.source,
      text:             input.text,
      importance_score: input.importance_score,
      created_at:       now(),
    };

    let id_str     = encode_uuid(record.id);
    let owner_str  = encode_uuid(record.owner_id);
    let rel_str    = record.relationship_id.map(encode_uuid);
    let source_str = record.source.as_str();
    let text       = record.text.clone();
    let importance = record.importance_score;
    let at_str     = encode_dt(record.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO echoes (
             echo_id, owner_id, relationship_id, source, text,
             importance_score, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![id_str, owner_str, rel_str, source_str, text, importance, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }

  async fn recent_echoes(&self, owner: Uuid, limit: usize) -> Result<Vec<EchoRecord>> {
    let owner_str = encode_uuid(owner);
    let limit_val = limit as i64;

    let raws: Vec<RawEcho> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM echoes
           WHERE owner_id = ?1
           ORDER BY created_at DESC, rowid DESC
           LIMIT ?2",
          RawEcho::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str, limit_val], RawEcho::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEcho::into_record).collect()
  }

  // ── Analytics ─────────────────────────────────────────────────────────────

  async fn record_analytics_event(&self, input: NewAnalyticsEvent) -> Result<AnalyticsEvent> {
    let event = AnalyticsEvent {
      id:         Uuid::new_v4(),
      owner_id:   input.owner_id,
      event_name: input.event_name,
      metadata:   input.metadata,
      created_at: now(),
    };

    let id_str       = encode_uuid(event.id);
    let owner_str    = encode_uuid(event.owner_id);
    let name         = event.event_name.clone();
    let metadata_str = serde_json::to_string(&event.metadata)?;
    let at_str       = encode_dt(event.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO analytics_events (event_id, owner_id, event_name, metadata, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, owner_str, name, metadata_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(event)
  }

  async fn list_analytics_events(&self, owner: Uuid) -> Result<Vec<AnalyticsEvent>> {
    let owner_str = encode_uuid(owner);

    let raws: Vec<RawAnalyticsEvent> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT event_id, owner_id, event_name, metadata, created_at
           FROM analytics_events
           WHERE owner_id = ?1
           ORDER BY created_at ASC, rowid ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str], |row| {
            Ok(RawAnalyticsEvent {
              event_id:   row.get(0)?,
              owner_id:   row.get(1)?,
              event_name: row.get(2)?,
              metadata:   row.get(3)?,
              created_at: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAnalyticsEvent::into_event).collect()
  }
}
