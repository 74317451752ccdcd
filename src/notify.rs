//! Fire-and-forget user notifications.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

/// Visual weight of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastVariant {
  #[default]
  Default,
  Success,
  Destructive,
}

/// A short notification shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
  pub title: String,
  pub description: String,
  pub variant: ToastVariant,
}

impl Toast {
  pub fn new(title: impl Into<String>, description: impl Into<String>, variant: ToastVariant) -> Self {
    Self {
      title: title.into(),
      description: description.into(),
      variant,
    }
  }
}

/// Sink for toasts; the return value of a toast is never used.
pub trait Notifier: Send + Sync {
  fn toast(&self, toast: Toast);
}

/// Bounded queue of toasts that a UI drains on its own schedule.
#[derive(Debug, Clone)]
pub struct ToastLog {
  queue: Arc<Mutex<VecDeque<Toast>>>,
  capacity: usize,
}

impl Default for ToastLog {
  fn default() -> Self {
    Self::with_capacity(16)
  }
}

impl ToastLog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      queue: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
      capacity: capacity.max(1),
    }
  }

  /// Remove and return every queued toast, oldest first.
  pub fn drain(&self) -> Vec<Toast> {
    self
      .queue
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .drain(..)
      .collect()
  }

  /// Copy of the queued toasts without removing them.
  pub fn pending(&self) -> Vec<Toast> {
    self
      .queue
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .iter()
      .cloned()
      .collect()
  }
}

impl Notifier for ToastLog {
  fn toast(&self, toast: Toast) {
    info!(title = %toast.title, variant = ?toast.variant, "{}", toast.description);
    let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
    if queue.len() == self.capacity {
      queue.pop_front();
    }
    queue.push_back(toast);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_oldest_toasts_are_dropped_at_capacity() {
    let log = ToastLog::with_capacity(2);
    for i in 0..3 {
      log.toast(Toast::new(format!("t{}", i), "", ToastVariant::Default));
    }
    let titles: Vec<String> = log.drain().into_iter().map(|t| t.title).collect();
    assert_eq!(titles, ["t1", "t2"]);
    assert!(log.drain().is_empty());
  }
}
