//! Background work whose results are picked up on the UI tick.
//!
//! Views cannot await inside key handlers, so async work is spawned here and
//! its results are collected with `poll()` from the event loop:
//!
//! ```ignore
//! let mut tasks = TaskSet::new();
//! let actions = module.actions();
//! tasks.spawn(async move { TabEvent::Refreshed(actions.refresh(true).await.is_ok()) });
//!
//! // In event loop tick
//! for event in tasks.poll() {
//!     handle(event);
//! }
//! ```

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Set of spawned tasks reporting results of type `E`.
pub struct TaskSet<E> {
  tx: mpsc::UnboundedSender<E>,
  rx: mpsc::UnboundedReceiver<E>,
  running: Arc<AtomicUsize>,
}

impl<E: Send + 'static> Default for TaskSet<E> {
  fn default() -> Self {
    Self::new()
  }
}

impl<E: Send + 'static> TaskSet<E> {
  pub fn new() -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    Self {
      tx,
      rx,
      running: Arc::new(AtomicUsize::new(0)),
    }
  }

  /// Run `future` in the background; its output shows up in `poll()`.
  pub fn spawn<F>(&self, future: F)
  where
    F: Future<Output = E> + Send + 'static,
  {
    let tx = self.tx.clone();
    let running = Arc::clone(&self.running);
    running.fetch_add(1, Ordering::SeqCst);
    tokio::spawn(async move {
      let result = future.await;
      running.fetch_sub(1, Ordering::SeqCst);
      // Receiver may be gone if the view was dropped
      let _ = tx.send(result);
    });
  }

  /// Whether any spawned task has not finished yet.
  pub fn is_busy(&self) -> bool {
    self.running.load(Ordering::SeqCst) > 0
  }

  /// Collect every result that arrived since the last poll, without blocking.
  pub fn poll(&mut self) -> Vec<E> {
    let mut results = Vec::new();
    while let Ok(result) = self.rx.try_recv() {
      results.push(result);
    }
    results
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;

  #[tokio::test]
  async fn test_poll_collects_results() {
    let mut tasks = TaskSet::new();
    tasks.spawn(async { 1 });
    tasks.spawn(async { 2 });

    tokio::time::sleep(Duration::from_millis(10)).await;

    let mut results = tasks.poll();
    results.sort();
    assert_eq!(results, vec![1, 2]);
    assert!(!tasks.is_busy());
    assert!(tasks.poll().is_empty());
  }

  #[tokio::test]
  async fn test_busy_while_running() {
    let mut tasks = TaskSet::new();
    tasks.spawn(async {
      tokio::time::sleep(Duration::from_millis(100)).await;
      "done"
    });

    assert!(tasks.is_busy());
    assert!(tasks.poll().is_empty());

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(tasks.poll(), vec!["done"]);
  }
}
