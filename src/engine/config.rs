use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::pipeline::{standard_filter, FieldSchema, FilterFn, Filters, SortConfig};
use crate::sdk::EntitySdk;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Everything a tab hands to its engine.
///
/// Immutable once the engine is built.
#[derive(Clone)]
pub struct EntityConfig {
  /// Cache key, unique per entity type
  pub key: String,
  pub entity_name: String,
  pub entity_name_plural: String,
  pub sdk: Arc<dyn EntitySdk>,
  pub initial_filters: Filters,
  pub initial_sort: SortConfig,
  pub filter_fn: FilterFn,
  pub search_fields: Vec<String>,
  /// Namespace for persisted view settings
  pub storage_key: String,
  pub fields: FieldSchema,
  /// Overrides the coordinator's default TTL
  pub ttl: Option<Duration>,
  pub page_size: usize,
  /// Server-side ordering requested on list calls
  pub sort_hint: Option<String>,
  /// Field used to label records in toasts and dialogs
  pub title_field: Option<String>,
}

impl EntityConfig {
  pub fn new(key: impl Into<String>, entity_name: impl Into<String>, sdk: Arc<dyn EntitySdk>) -> Self {
    let key = key.into();
    let entity_name = entity_name.into();
    Self {
      storage_key: key.clone(),
      entity_name_plural: format!("{}s", entity_name),
      key,
      entity_name,
      sdk,
      initial_filters: Filters::new(),
      initial_sort: SortConfig::default(),
      filter_fn: standard_filter(Vec::new()),
      search_fields: Vec::new(),
      fields: FieldSchema::new(),
      ttl: None,
      page_size: DEFAULT_PAGE_SIZE,
      sort_hint: None,
      title_field: None,
    }
  }

  pub fn with_plural(mut self, plural: impl Into<String>) -> Self {
    self.entity_name_plural = plural.into();
    self
  }

  /// Search these fields with the stock predicate.
  ///
  /// Replaces any predicate set earlier; call `with_filter_fn` afterwards
  /// to use a custom one.
  pub fn with_search_fields(mut self, fields: Vec<String>) -> Self {
    self.filter_fn = standard_filter(fields.clone());
    self.search_fields = fields;
    self
  }

  pub fn with_filter_fn(mut self, filter_fn: FilterFn) -> Self {
    self.filter_fn = filter_fn;
    self
  }

  pub fn with_initial_filters(mut self, filters: Filters) -> Self {
    self.initial_filters = filters;
    self
  }

  pub fn with_initial_sort(mut self, sort: SortConfig) -> Self {
    self.initial_sort = sort;
    self
  }

  pub fn with_storage_key(mut self, storage_key: impl Into<String>) -> Self {
    self.storage_key = storage_key.into();
    self
  }

  pub fn with_fields(mut self, fields: FieldSchema) -> Self {
    self.fields = fields;
    self
  }

  pub fn with_ttl(mut self, ttl: Duration) -> Self {
    self.ttl = Some(ttl);
    self
  }

  pub fn with_page_size(mut self, page_size: usize) -> Self {
    self.page_size = page_size.max(1);
    self
  }

  pub fn with_sort_hint(mut self, sort_hint: impl Into<String>) -> Self {
    self.sort_hint = Some(sort_hint.into());
    self
  }

  pub fn with_title_field(mut self, field: impl Into<String>) -> Self {
    self.title_field = Some(field.into());
    self
  }
}

impl fmt::Debug for EntityConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("EntityConfig")
      .field("key", &self.key)
      .field("entity_name", &self.entity_name)
      .field("storage_key", &self.storage_key)
      .field("initial_filters", &self.initial_filters)
      .field("initial_sort", &self.initial_sort)
      .field("ttl", &self.ttl)
      .field("page_size", &self.page_size)
      .finish_non_exhaustive()
  }
}
