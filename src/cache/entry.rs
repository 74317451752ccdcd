use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::entity::Entity;

/// Read-only view of one key's cache slot.
#[derive(Debug, Clone, Default)]
pub struct CacheEntry {
  /// Last successfully fetched records; kept when later fetches fail
  pub data: Option<Arc<Vec<Entity>>>,
  /// When `data` was fetched
  pub fetched_at: Option<DateTime<Utc>>,
  /// A network fetch is running
  pub loading: bool,
  /// Description of the last failure, cleared when a new fetch starts
  pub error: Option<String>,
  /// A retry is scheduled for the current error
  pub retry_pending: bool,
}

impl CacheEntry {
  pub fn has_data(&self) -> bool {
    self.data.is_some()
  }

  /// Records currently cached, or an empty slice.
  pub fn records(&self) -> &[Entity] {
    self.data.as_deref().map(Vec::as_slice).unwrap_or(&[])
  }
}
