//! [`Engine`]: the shared collaborators behind every round.

use std::sync::Arc;

use rand_core::RngCore;
use tend_core::{
  echo::EchoSource, relationship::RelationshipRecord, store::CircleStore,
};
use uuid::Uuid;

use crate::{
  BackgroundTasks, EchoContext, EchoGenerator, EngineConfig, ProgressionController, Result,
  SideEffectDispatcher,
};

/// Store, echo generator, dispatcher and task tracker, built once per
/// process and shared by all controllers.
///
/// Cloning is cheap: every part is reference-counted.
pub struct Engine<S> {
  store:      Arc<S>,
  echoes:     Arc<EchoGenerator<S>>,
  dispatcher: Arc<SideEffectDispatcher<S>>,
  tasks:      BackgroundTasks,
}

impl<S> Clone for Engine<S> {
  fn clone(&self) -> Self {
    Self {
      store:      Arc::clone(&self.store),
      echoes:     Arc::clone(&self.echoes),
      dispatcher: Arc::clone(&self.dispatcher),
      tasks:      self.tasks.clone(),
    }
  }
}

impl<S: CircleStore + 'static> Engine<S> {
  pub fn new(
    store: Arc<S>,
    config: EngineConfig,
    rng: Box<dyn RngCore + Send>,
  ) -> Result<Self> {
    let dispatcher = SideEffectDispatcher::new(Arc::clone(&store), &config)?;
    Ok(Self {
      echoes: Arc::new(EchoGenerator::new(Arc::clone(&store), rng)),
      dispatcher: Arc::new(dispatcher),
      tasks: BackgroundTasks::new(),
      store,
    })
  }

  /// A fresh controller for `owner`, still in `Loading`.
  pub fn controller(&self, owner: Uuid) -> ProgressionController<S> {
    ProgressionController::new(self.clone(), owner)
  }

  /// Build a controller and load its roster. The returned controller is in
  /// `Active(0)` or `Empty`.
  pub async fn start_round(&self, owner: Uuid) -> Result<ProgressionController<S>> {
    let mut controller = self.controller(owner);
    controller.load().await?;
    Ok(controller)
  }

  /// Report a newly added relationship in the background, along with the
  /// circle size that results.
  pub fn relationship_added(&self, owner: Uuid, person: RelationshipRecord) {
    let store = Arc::clone(&self.store);
    let dispatcher = Arc::clone(&self.dispatcher);
    self.tasks.spawn(async move {
      match store.list_relationships(owner).await {
        Ok(circle) => {
          dispatcher
            .circle_updated(owner, &person, circle.len(), "add")
            .await;
        }
        Err(err) => {
          tracing::warn!(%owner, error = %err, "could not size circle, dropping circle_updated")
        }
      }
    });
  }

  /// A dream was saved: echo it, then report it, in the background.
  pub fn dream_saved(&self, owner: Uuid, text: String, is_new: bool) {
    let echoes = Arc::clone(&self.echoes);
    let dispatcher = Arc::clone(&self.dispatcher);
    self.tasks.spawn(async move {
      echoes
        .generate_and_report(&dispatcher, owner, EchoSource::Dream, EchoContext::default())
        .await;
      dispatcher.dream_saved(owner, &text, is_new).await;
    });
  }

  /// A gratitude spark was captured: echo it, then report it, in the
  /// background.
  pub fn spark_saved(&self, owner: Uuid, text: String) {
    let echoes = Arc::clone(&self.echoes);
    let dispatcher = Arc::clone(&self.dispatcher);
    self.tasks.spawn(async move {
      echoes
        .generate_and_report(
          &dispatcher,
          owner,
          EchoSource::Gratitude,
          EchoContext::default(),
        )
        .await;
      dispatcher.spark_created(owner, &text).await;
    });
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  pub fn echoes(&self) -> &Arc<EchoGenerator<S>> { &self.echoes }

  pub fn dispatcher(&self) -> &Arc<SideEffectDispatcher<S>> { &self.dispatcher }

  pub fn tasks(&self) -> &BackgroundTasks { &self.tasks }
}
