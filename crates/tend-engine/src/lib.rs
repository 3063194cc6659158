//! The check-in progression engine.
//!
//! A [`ProgressionController`] walks one owner through their roster, one
//! relationship at a time. Each decision is either a check-in, which is
//! persisted before the cursor moves, or a skip. Everything else the flow
//! triggers (echo generation, analytics, webhooks, round telemetry) runs on
//! background tasks and can never hold up or undo a transition.
//!
//! ```rust,ignore
//! let engine = Engine::new(store, EngineConfig::default(), Box::new(OsRng))?;
//! let mut round = engine.start_round(owner).await?;
//! round.check_in(Decision::new(CheckInType::Pinged, Some("hi"))).await?;
//! round.skip()?;
//! ```

pub mod completion;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod echo;
pub mod engine;
pub mod error;
pub mod recorder;
pub mod roster;
pub mod tasks;

pub use completion::{CompletionAggregator, RoundSummary};
pub use config::{EngineConfig, WebhookConfig};
pub use controller::{Decision, EngineState, ProgressionController, ProgressionState};
pub use dispatch::{Delivery, SideEffectDispatcher};
pub use echo::{EchoContext, EchoGenerator, EchoOutcome};
pub use engine::Engine;
pub use error::{EngineError, Result};
pub use tasks::BackgroundTasks;
