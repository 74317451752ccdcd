use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::entity::{value_text, Entity};

/// Categorical filter value meaning "match everything".
pub const ALL: &str = "all";

/// Name of the free-text filter understood by [`standard_filter`].
pub const SEARCH_FILTER: &str = "search";

/// Active filter values, keyed by filter name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filters(BTreeMap<String, String>);

impl Filters {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.set(name, value);
    self
  }

  pub fn get(&self, name: &str) -> Option<&str> {
    self.0.get(name).map(String::as_str)
  }

  /// Set a filter value; returns true if it changed.
  pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
    let name = name.into();
    let value = value.into();
    if self.0.get(&name) == Some(&value) {
      return false;
    }
    self.0.insert(name, value);
    true
  }

  /// Iterate over filters that actually constrain the result.
  pub fn active(&self) -> impl Iterator<Item = (&str, &str)> {
    self
      .0
      .iter()
      .filter(|(_, v)| !is_unconstrained(v))
      .map(|(k, v)| (k.as_str(), v.as_str()))
  }

  pub fn is_constrained(&self, name: &str) -> bool {
    self.get(name).is_some_and(|v| !is_unconstrained(v))
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }
}

/// `"all"` and blank values place no constraint on a filter.
pub fn is_unconstrained(value: &str) -> bool {
  let value = value.trim();
  value.is_empty() || value.eq_ignore_ascii_case(ALL)
}

/// Predicate deciding whether one record matches the active filters.
pub type FilterFn = Arc<dyn Fn(&Entity, &Filters) -> bool + Send + Sync>;

/// Filter predicate shared by most tabs.
///
/// `search` does a case-insensitive substring match over `search_fields`;
/// every other filter compares the field of the same name for equality,
/// ignoring case. All criteria must hold.
pub fn standard_filter(search_fields: Vec<String>) -> FilterFn {
  Arc::new(move |entity: &Entity, filters: &Filters| {
    filters.active().all(|(name, value)| {
      if name == SEARCH_FILTER {
        let needle = value.trim().to_lowercase();
        search_fields.iter().any(|field| {
          entity
            .text(field)
            .is_some_and(|text| text.to_lowercase().contains(&needle))
        })
      } else {
        entity
          .get(name)
          .and_then(value_text)
          .is_some_and(|text| text.eq_ignore_ascii_case(value.trim()))
      }
    })
  })
}

/// Apply the predicate over the full set, keeping original order.
pub fn filter_items<'a>(items: &'a [Entity], filters: &Filters, predicate: &FilterFn) -> Vec<&'a Entity> {
  items.iter().filter(|item| predicate(item, filters)).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn doctors() -> Vec<Entity> {
    [
      json!({"id": 1, "name": "Anna Berg", "specialty": "Cardiology", "status": "active"}),
      json!({"id": 2, "name": "Tom Kern", "specialty": "Neurology", "status": "inactive"}),
      json!({"id": 3, "name": "Lena Bergmann", "specialty": "cardiology", "status": "active"}),
      json!({"id": 4, "name": "Max Roth", "specialty": null, "status": "pending"}),
    ]
    .into_iter()
    .filter_map(Entity::from_value)
    .collect()
  }

  fn predicate() -> FilterFn {
    standard_filter(vec!["name".to_string(), "specialty".to_string()])
  }

  fn ids(items: &[&Entity]) -> Vec<String> {
    items.iter().filter_map(|e| e.id()).map(|id| id.to_string()).collect()
  }

  #[test]
  fn test_all_and_blank_match_everything() {
    let items = doctors();
    let filters = Filters::new().with("status", "all").with(SEARCH_FILTER, "  ");
    assert_eq!(filter_items(&items, &filters, &predicate()).len(), 4);
  }

  #[test]
  fn test_search_is_case_insensitive_substring() {
    let items = doctors();
    let filters = Filters::new().with(SEARCH_FILTER, "BERG");
    assert_eq!(ids(&filter_items(&items, &filters, &predicate())), ["1", "3"]);
  }

  #[test]
  fn test_criteria_compose_with_and() {
    let items = doctors();
    let filters = Filters::new()
      .with(SEARCH_FILTER, "cardio")
      .with("status", "ACTIVE");
    assert_eq!(ids(&filter_items(&items, &filters, &predicate())), ["1", "3"]);

    let filters = filters.with("specialty", "neurology");
    assert!(filter_items(&items, &filters, &predicate()).is_empty());
  }

  #[test]
  fn test_filter_is_subset_and_idempotent() {
    let items = doctors();
    let filters = Filters::new().with("status", "active");
    let once: Vec<Entity> = filter_items(&items, &filters, &predicate())
      .into_iter()
      .cloned()
      .collect();
    assert!(once.iter().all(|e| items.contains(e)));

    let twice = filter_items(&once, &filters, &predicate());
    assert_eq!(twice.len(), once.len());
    assert!(twice.iter().zip(once.iter()).all(|(a, b)| *a == b));
  }

  #[test]
  fn test_set_reports_changes() {
    let mut filters = Filters::new();
    assert!(filters.set("status", "active"));
    assert!(!filters.set("status", "active"));
    assert!(filters.is_constrained("status"));
    assert!(filters.set("status", ALL));
    assert!(!filters.is_constrained("status"));
  }
}
