//! The progression state machine.
//!
//! ```text
//! Loading ──load──▶ Empty
//!    │
//!    └──load──▶ Active(0) ──check_in / skip──▶ Active(1) … ──▶ Completed
//! ```
//!
//! `Empty` and `Completed` are absorbing. A controller is never resumed:
//! re-entering the flow means building a new one.

use std::{sync::Arc, time::Instant};

use serde::Serialize;
use tend_core::{
  checkin::{CheckInEvent, CheckInType, Note},
  echo::EchoSource,
  relationship::RelationshipRecord,
  store::CircleStore,
};
use uuid::Uuid;

use crate::{
  CompletionAggregator, EchoContext, Engine, EngineError, Result, RoundSummary,
  recorder::CheckInRecorder, roster::RosterLoader,
};

// ─── Progression state ───────────────────────────────────────────────────────

/// In-memory cursor over one round. Never persisted.
#[derive(Debug, Clone)]
pub struct ProgressionState {
  /// Relationship ids in walk order.
  pub roster:        Vec<Uuid>,
  /// `0 ≤ cursor ≤ roster.len()`.
  pub cursor:        usize,
  pub round_start:   Instant,
  /// Once set, no further decisions are accepted.
  pub terminal:      bool,
  pub skipped_count: usize,
}

impl ProgressionState {
  fn new(roster: Vec<Uuid>) -> Self {
    Self {
      roster,
      cursor: 0,
      round_start: Instant::now(),
      terminal: false,
      skipped_count: 0,
    }
  }
}

// ─── Observable state ────────────────────────────────────────────────────────

/// A snapshot of where the round stands.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum EngineState {
  Loading,
  /// The owner has nobody in their circle; send them to roster setup.
  Empty,
  Active {
    cursor:  usize,
    total:   usize,
    /// The relationship the next decision applies to.
    current: RelationshipRecord,
  },
  Completed {
    summary: RoundSummary,
  },
}

impl EngineState {
  pub fn name(&self) -> &'static str {
    match self {
      Self::Loading => "loading",
      Self::Empty => "empty",
      Self::Active { .. } => "active",
      Self::Completed { .. } => "completed",
    }
  }
}

/// One user decision for the relationship at the cursor.
#[derive(Debug, Clone)]
pub struct Decision {
  pub kind: CheckInType,
  pub note: Option<Note>,
}

impl Decision {
  /// Build a decision from raw note input; see [`Note::new`].
  pub fn new(kind: CheckInType, note: Option<&str>) -> Self {
    Self { kind, note: Note::from_optional(note) }
  }
}

/// The people still to visit in an active round. `current` is the
/// relationship at `progress.cursor`.
struct Walk {
  current:  RelationshipRecord,
  upcoming: std::vec::IntoIter<RelationshipRecord>,
  progress: ProgressionState,
}

enum Phase {
  Loading,
  Empty,
  Active(Walk),
  Completed {
    progress: ProgressionState,
    summary:  RoundSummary,
  },
}

// ─── Controller ──────────────────────────────────────────────────────────────

/// Drives one owner through one round.
///
/// Decisions take `&mut self`, so a caller cannot submit a second decision
/// while the first check-in write is still in flight.
pub struct ProgressionController<S> {
  owner:  Uuid,
  engine: Engine<S>,
  phase:  Phase,
}

impl<S: CircleStore + 'static> ProgressionController<S> {
  /// A controller in `Loading`; call [`ProgressionController::load`] next.
  pub fn new(engine: Engine<S>, owner: Uuid) -> Self {
    Self { owner, engine, phase: Phase::Loading }
  }

  pub fn owner(&self) -> Uuid { self.owner }

  /// The cursor over the round, once the roster has been loaded into one.
  pub fn progress(&self) -> Option<&ProgressionState> {
    match &self.phase {
      Phase::Active(walk) => Some(&walk.progress),
      Phase::Completed { progress, .. } => Some(progress),
      Phase::Loading | Phase::Empty => None,
    }
  }

  pub fn state(&self) -> EngineState {
    match &self.phase {
      Phase::Loading => EngineState::Loading,
      Phase::Empty => EngineState::Empty,
      Phase::Active(walk) => EngineState::Active {
        cursor:  walk.progress.cursor,
        total:   walk.progress.roster.len(),
        current: walk.current.clone(),
      },
      Phase::Completed { summary, .. } => EngineState::Completed { summary: *summary },
    }
  }

  /// Read the roster and enter `Active(0)`, or `Empty` if there is nobody to
  /// walk. On failure the controller stays in `Loading` and may be retried.
  pub async fn load(&mut self) -> Result<EngineState> {
    if !matches!(self.phase, Phase::Loading) {
      return Err(self.invalid("load"));
    }

    let roster = RosterLoader::new(Arc::clone(self.engine.store()))
      .load(self.owner)
      .await?;

    let progress = ProgressionState::new(roster.iter().map(|r| r.id).collect());
    let mut upcoming = roster.into_iter();
    let Some(current) = upcoming.next() else {
      tracing::debug!(owner = %self.owner, "empty roster, not starting a round");
      self.phase = Phase::Empty;
      return Ok(self.state());
    };

    tracing::debug!(owner = %self.owner, size = progress.roster.len(), "round started");
    self.phase = Phase::Active(Walk { current, upcoming, progress });

    let dispatcher = Arc::clone(self.engine.dispatcher());
    let owner = self.owner;
    self.engine.tasks().spawn(async move {
      dispatcher.session_start(Some(owner)).await;
    });

    Ok(self.state())
  }

  /// Persist a check-in for the current relationship, then advance. If the
  /// write fails the cursor stays put and the same call can be retried.
  pub async fn check_in(&mut self, decision: Decision) -> Result<EngineState> {
    let person = self.current("check_in")?.clone();

    let event = CheckInRecorder::new(Arc::clone(self.engine.store()))
      .record(self.owner, person.id, decision.kind, decision.note)
      .await?;

    self.spawn_checkin_effects(person, event);
    Ok(self.advance(false))
  }

  /// Move past the current relationship without recording anything.
  pub fn skip(&mut self) -> Result<EngineState> {
    self.current("skip")?;
    Ok(self.advance(true))
  }

  // ── Internals ─────────────────────────────────────────────────────────

  fn invalid(&self, action: &'static str) -> EngineError {
    EngineError::InvalidState { action, state: self.state().name() }
  }

  fn current(&self, action: &'static str) -> Result<&RelationshipRecord> {
    match &self.phase {
      Phase::Active(walk) => Ok(&walk.current),
      _ => Err(self.invalid(action)),
    }
  }

  /// Step past `current`. Only called from `Active`.
  fn advance(&mut self, skipped: bool) -> EngineState {
    let Phase::Active(walk) = &mut self.phase else {
      return self.state();
    };
    if skipped {
      walk.progress.skipped_count += 1;
    }
    walk.progress.cursor += 1;

    if let Some(next) = walk.upcoming.next() {
      walk.current = next;
      tracing::debug!(owner = %self.owner, cursor = walk.progress.cursor, skipped, "advanced");
      return self.state();
    }

    walk.progress.terminal = true;
    let aggregator = CompletionAggregator::new(
      Arc::clone(self.engine.dispatcher()),
      self.engine.tasks().clone(),
    );
    let summary = aggregator.complete(self.owner, &walk.progress);
    let progress = walk.progress.clone();
    self.phase = Phase::Completed { progress, summary };
    self.state()
  }

  fn spawn_checkin_effects(&self, person: RelationshipRecord, event: CheckInEvent) {
    let owner = self.owner;

    let echoes = Arc::clone(self.engine.echoes());
    let dispatcher = Arc::clone(self.engine.dispatcher());
    let context = EchoContext::for_checkin(&person, event.kind);
    self.engine.tasks().spawn(async move {
      echoes
        .generate_and_report(&dispatcher, owner, EchoSource::Checkin, context)
        .await;
    });

    let dispatcher = Arc::clone(self.engine.dispatcher());
    self.engine.tasks().spawn(async move {
      dispatcher.checkin_completed(owner, &person, &event).await;
    });
  }
}
