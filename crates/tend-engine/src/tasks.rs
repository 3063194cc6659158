//! Tracking for fire-and-forget work.

use std::{
  future::Future,
  mem,
  sync::{Arc, Mutex, PoisonError},
};

use tokio::task::JoinHandle;

/// Handles to background side-effect tasks.
///
/// Tasks are plain `tokio::spawn`s: dropping this handle (or the controller
/// that spawned them) never cancels them. [`BackgroundTasks::settle`] waits
/// for everything currently in flight.
#[derive(Clone, Default)]
pub struct BackgroundTasks {
  handles: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl BackgroundTasks {
  pub fn new() -> Self { Self::default() }

  /// Spawn `task` onto the current runtime and keep its handle.
  pub fn spawn<F>(&self, task: F)
  where
    F: Future<Output = ()> + Send + 'static,
  {
    let handle = tokio::spawn(task);
    let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
    handles.retain(|h| !h.is_finished());
    handles.push(handle);
  }

  /// Number of tasks that have not finished yet.
  pub fn in_flight(&self) -> usize {
    self
      .handles
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .iter()
      .filter(|h| !h.is_finished())
      .count()
  }

  /// Wait until every tracked task, including ones spawned while waiting,
  /// has finished.
  pub async fn settle(&self) {
    loop {
      let batch = {
        let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
        mem::take(&mut *handles)
      };
      if batch.is_empty() {
        return;
      }
      for handle in batch {
        if let Err(e) = handle.await {
          tracing::warn!(error = %e, "background task ended abnormally");
        }
      }
    }
  }
}
