//! Persisted view preferences: view mode, filters and sort per storage key.

mod storage;

pub use storage::{NoopPreferences, PreferenceStore, SqlitePreferences};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::warn;

use crate::pipeline::{Filters, SortConfig};

const VIEW_MODE: &str = "view_mode";
const FILTERS: &str = "filters";
const SORT: &str = "sort";

/// How a list is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
  Card,
  #[default]
  Table,
  Kanban,
}

impl ViewMode {
  pub const ALL: [ViewMode; 3] = [ViewMode::Card, ViewMode::Table, ViewMode::Kanban];

  pub fn as_str(&self) -> &'static str {
    match self {
      ViewMode::Card => "card",
      ViewMode::Table => "table",
      ViewMode::Kanban => "kanban",
    }
  }

  /// Next mode in display order, wrapping around.
  pub fn cycle(&self) -> Self {
    match self {
      ViewMode::Card => ViewMode::Table,
      ViewMode::Table => ViewMode::Kanban,
      ViewMode::Kanban => ViewMode::Card,
    }
  }
}

impl fmt::Display for ViewMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ViewMode {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    ViewMode::ALL
      .into_iter()
      .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
      .ok_or_else(|| format!("unknown view mode '{}'", s))
  }
}

/// Typed access to one view's persisted settings.
///
/// Storage failures are logged and never surface to the caller: a missing
/// or broken preference falls back to the view's defaults.
#[derive(Clone)]
pub struct ViewPreferences {
  store: Arc<dyn PreferenceStore>,
  storage_key: String,
}

impl ViewPreferences {
  pub fn new(store: Arc<dyn PreferenceStore>, storage_key: impl Into<String>) -> Self {
    Self {
      store,
      storage_key: storage_key.into(),
    }
  }

  pub fn storage_key(&self) -> &str {
    &self.storage_key
  }

  fn load<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
    let raw = match self.store.get(&self.storage_key, name) {
      Ok(raw) => raw?,
      Err(e) => {
        warn!(key = %self.storage_key, name, error = %e, "could not read preference");
        return None;
      }
    };
    serde_json::from_str(&raw)
      .map_err(|e| warn!(key = %self.storage_key, name, error = %e, "ignoring malformed preference"))
      .ok()
  }

  fn save<T: Serialize>(&self, name: &str, value: &T) {
    let result = serde_json::to_string(value)
      .map_err(|e| color_eyre::eyre::eyre!("Failed to serialize preference: {}", e))
      .and_then(|raw| self.store.set(&self.storage_key, name, &raw));
    if let Err(e) = result {
      warn!(key = %self.storage_key, name, error = %e, "could not store preference");
    }
  }

  pub fn view_mode(&self) -> Option<ViewMode> {
    self.load(VIEW_MODE)
  }

  pub fn save_view_mode(&self, mode: ViewMode) {
    self.save(VIEW_MODE, &mode);
  }

  pub fn filters(&self) -> Option<Filters> {
    self.load(FILTERS)
  }

  pub fn save_filters(&self, filters: &Filters) {
    self.save(FILTERS, filters);
  }

  pub fn sort(&self) -> Option<SortConfig> {
    self.load(SORT)
  }

  pub fn save_sort(&self, sort: &SortConfig) {
    self.save(SORT, sort);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::pipeline::SortKey;

  fn prefs(key: &str) -> ViewPreferences {
    let store: Arc<dyn PreferenceStore> = Arc::new(SqlitePreferences::open_in_memory().unwrap());
    ViewPreferences::new(store, key)
  }

  #[test]
  fn test_view_mode_parse() {
    assert_eq!("Kanban".parse::<ViewMode>(), Ok(ViewMode::Kanban));
    assert!("grid".parse::<ViewMode>().is_err());
    assert_eq!(ViewMode::Kanban.cycle(), ViewMode::Card);
  }

  #[test]
  fn test_round_trips_view_state() {
    let prefs = prefs("policies");
    assert_eq!(prefs.view_mode(), None);

    let filters = Filters::new().with("status", "active");
    let sort = SortConfig::new(vec![SortKey::desc("updated_date")]);
    prefs.save_view_mode(ViewMode::Card);
    prefs.save_filters(&filters);
    prefs.save_sort(&sort);

    assert_eq!(prefs.view_mode(), Some(ViewMode::Card));
    assert_eq!(prefs.filters(), Some(filters));
    assert_eq!(prefs.sort(), Some(sort));
  }

  #[test]
  fn test_malformed_value_falls_back() {
    let store = Arc::new(SqlitePreferences::open_in_memory().unwrap());
    store.set("policies", VIEW_MODE, "not json").unwrap();
    let prefs = ViewPreferences::new(store, "policies");
    assert_eq!(prefs.view_mode(), None);
  }
}
