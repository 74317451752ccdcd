//! The list engine every tab instantiates.
//!
//! An `EntityModule` ties one entity type's cache slot to its list controls
//! (filters, sort, page), selection mode and dialog state. Reads run the
//! pipeline over the cached records each time; writes go through
//! `EntityActions`, which can also be cloned out and driven from a
//! background task.

mod actions;
mod config;

pub use actions::EntityActions;
pub use config::{EntityConfig, DEFAULT_PAGE_SIZE};

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::bulk::BulkOutcome;
use crate::cache::{CacheCoordinator, CacheEntry, FetchResult, FetchSettings};
use crate::dialog::{DialogClosed, DialogController, DialogOutcome};
use crate::entity::{Entity, EntityId};
use crate::notify::{Notifier, Toast, ToastVariant};
use crate::pipeline::{self, Filters, ListView, Pagination, PipelineInput, SortConfig, SortKey};
use crate::prefs::{PreferenceStore, ViewMode, ViewPreferences};
use crate::selection::{BulkIntent, SelectionCheck, SelectionController};

/// What the list area should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
  /// Nothing to show yet, including while a failed fetch waits for its retry
  Loading,
  /// No data and fetching gave up; show the error with a retry action
  Blocked(String),
  /// Data is available, possibly stale with a non-blocking warning
  Ready { warning: Option<String> },
}

/// One page of the pipeline output, detached from the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
  pub items: Vec<Entity>,
  pub pagination: Pagination,
}

pub struct EntityModule {
  config: Arc<EntityConfig>,
  actions: EntityActions,
  notifier: Arc<dyn Notifier>,
  prefs: ViewPreferences,
  filters: Filters,
  sort: SortConfig,
  page: usize,
  page_size: usize,
  view_mode: ViewMode,
  selection: SelectionController,
  dialog: DialogController,
}

impl EntityModule {
  /// Build an engine with its own cache and restore persisted view state.
  pub fn new(
    config: EntityConfig,
    store: Arc<dyn PreferenceStore>,
    notifier: Arc<dyn Notifier>,
    settings: FetchSettings,
  ) -> Self {
    let prefs = ViewPreferences::new(store, config.storage_key.clone());
    let filters = prefs
      .filters()
      .unwrap_or_else(|| config.initial_filters.clone());
    let sort = prefs.sort().unwrap_or_else(|| config.initial_sort.clone());
    let view_mode = prefs.view_mode().unwrap_or_default();

    let coordinator = CacheCoordinator::new(settings);
    let actions = EntityActions::new(&config, coordinator, Arc::clone(&notifier));
    debug!(key = %config.key, storage_key = %config.storage_key, %view_mode, "engine created");

    Self {
      page_size: config.page_size.max(1),
      dialog: DialogController::new(config.key.clone()),
      config: Arc::new(config),
      actions,
      notifier,
      prefs,
      filters,
      sort,
      page: 1,
      view_mode,
      selection: SelectionController::new(),
    }
  }

  pub fn config(&self) -> &EntityConfig {
    &self.config
  }

  pub fn key(&self) -> &str {
    &self.config.key
  }

  /// Handle for async work that outlives a borrow of the engine.
  pub fn actions(&self) -> EntityActions {
    self.actions.clone()
  }

  pub fn coordinator(&self) -> &CacheCoordinator {
    self.actions.coordinator()
  }

  pub async fn load(&self, force: bool) -> FetchResult {
    self.actions.refresh(force).await
  }

  // Read side

  pub fn entry(&self) -> CacheEntry {
    self.coordinator().snapshot(self.key())
  }

  pub fn loading(&self) -> bool {
    self.entry().loading
  }

  pub fn error(&self) -> Option<String> {
    self.entry().error
  }

  pub fn load_state(&self) -> LoadState {
    let entry = self.entry();
    match (entry.has_data(), entry.error) {
      (true, warning) => LoadState::Ready { warning },
      (false, Some(error)) if !entry.loading && !entry.retry_pending => LoadState::Blocked(error),
      (false, _) => LoadState::Loading,
    }
  }

  fn with_view<R>(&self, f: impl FnOnce(ListView<'_>) -> R) -> R {
    let entry = self.entry();
    let input = PipelineInput {
      filters: &self.filters,
      predicate: &self.config.filter_fn,
      sort: &self.sort,
      schema: &self.config.fields,
      page: self.page,
      page_size: self.page_size,
    };
    f(pipeline::run(entry.records(), &input))
  }

  /// Current page and its pagination, from one pipeline run.
  pub fn view(&self) -> PageView {
    self.with_view(|view| PageView {
      items: view.page().iter().map(|e| (*e).clone()).collect(),
      pagination: view.pagination,
    })
  }

  /// Every record matching the filters, sorted, across all pages.
  pub fn filtered(&self) -> Vec<Entity> {
    self.with_view(|view| view.filtered.into_iter().cloned().collect())
  }

  pub fn items(&self) -> Vec<Entity> {
    self.view().items
  }

  pub fn pagination(&self) -> Pagination {
    self.with_view(|view| view.pagination)
  }

  pub fn visible_ids(&self) -> Vec<EntityId> {
    self.with_view(|view| view.page().iter().filter_map(|e| e.id()).collect())
  }

  /// Look a record up in the full cached set, ignoring filters.
  pub fn find(&self, id: &EntityId) -> Option<Entity> {
    self
      .entry()
      .records()
      .iter()
      .find(|e| e.id().as_ref() == Some(id))
      .cloned()
  }

  // List controls

  pub fn filters(&self) -> &Filters {
    &self.filters
  }

  pub fn set_filter(&mut self, name: &str, value: &str) {
    if self.filters.set(name, value) {
      self.page = 1;
      self.prefs.save_filters(&self.filters);
    }
  }

  pub fn set_filters(&mut self, filters: Filters) {
    self.filters = filters;
    self.page = 1;
    self.prefs.save_filters(&self.filters);
  }

  pub fn reset_filters(&mut self) {
    self.set_filters(self.config.initial_filters.clone());
  }

  pub fn sort_config(&self) -> &SortConfig {
    &self.sort
  }

  pub fn set_sort(&mut self, sort: SortConfig) {
    self.sort = sort;
    self.prefs.save_sort(&self.sort);
  }

  /// Sort by `field`: ascending first, then flip direction on repeat.
  pub fn toggle_sort(&mut self, field: &str) {
    let key = match self.sort.primary() {
      Some(primary) if primary.id == field => SortKey {
        id: primary.id.clone(),
        desc: !primary.desc,
      },
      _ => SortKey::asc(field),
    };
    let mut keys = vec![key];
    keys.extend(self.sort.keys().iter().filter(|k| k.id != field).cloned());
    self.set_sort(SortConfig::new(keys));
  }

  pub fn set_page(&mut self, page: usize) {
    self.page = page.max(1);
  }

  pub fn next_page(&mut self) {
    let pagination = self.pagination();
    if pagination.has_next() {
      self.page = pagination.current_page + 1;
    }
  }

  pub fn prev_page(&mut self) {
    let pagination = self.pagination();
    if pagination.has_prev() {
      self.page = pagination.current_page - 1;
    }
  }

  pub fn page_size(&self) -> usize {
    self.page_size
  }

  pub fn set_page_size(&mut self, page_size: usize) {
    self.page_size = page_size.max(1);
    self.page = 1;
  }

  pub fn view_mode(&self) -> ViewMode {
    self.view_mode
  }

  pub fn set_view_mode(&mut self, mode: ViewMode) {
    self.view_mode = mode;
    self.prefs.save_view_mode(mode);
  }

  // Selection

  pub fn selection(&self) -> &SelectionController {
    &self.selection
  }

  pub fn start_selection(&mut self, intent: BulkIntent) {
    self.selection.start(intent);
  }

  pub fn toggle_selected(&mut self, id: EntityId) {
    self.selection.toggle(id);
  }

  /// Select or deselect every record on the current page.
  pub fn select_all_visible(&mut self) {
    let visible = self.visible_ids();
    self.selection.select_all_visible(&visible);
  }

  pub fn cancel_selection(&mut self) {
    self.selection.cancel();
  }

  /// Open the dialog for the single selected record and leave selection mode.
  pub fn edit_selected(&mut self) -> SelectionCheck {
    let check = self.selection.check(BulkIntent::Edit);
    match &check {
      SelectionCheck::Ready(ids) => {
        match ids.first().and_then(|id| self.find(id)) {
          Some(entity) => self.dialog.edit(entity),
          None => {
            warn!(key = %self.config.key, "selected record no longer exists");
            self.notify_selection("Record not found", "The selected record no longer exists.");
          }
        }
        self.selection.cancel();
      }
      SelectionCheck::NothingSelected => {
        self.notify_selection("Nothing selected", &format!("Select a {} to edit.", self.config.entity_name.to_lowercase()));
      }
      SelectionCheck::SelectOnlyOne => {
        self.notify_selection("Select only one", &format!("Select exactly one {} to edit.", self.config.entity_name.to_lowercase()));
      }
    }
    check
  }

  fn notify_selection(&self, title: &str, description: &str) {
    self
      .notifier
      .toast(Toast::new(title, description, ToastVariant::Default));
  }

  /// Delete every selected record, then leave selection mode.
  ///
  /// Returns `None` without touching the backend when nothing is selected.
  pub async fn bulk_delete(&mut self) -> Option<BulkOutcome> {
    let ids = match self.selection.check(BulkIntent::Delete) {
      SelectionCheck::Ready(ids) => ids,
      _ => {
        self.notify_selection(
          "Nothing selected",
          &format!("Select the {} to delete.", self.config.entity_name_plural.to_lowercase()),
        );
        return None;
      }
    };
    let outcome = self.actions.delete_all(&ids).await;
    self.selection.cancel();
    Some(outcome)
  }

  pub async fn import_records(&self, payloads: Vec<Value>) -> BulkOutcome {
    self.actions.import_all(payloads).await
  }

  // Dialog

  pub fn dialog(&self) -> &DialogController {
    &self.dialog
  }

  pub fn add_new(&mut self) {
    self.dialog.add_new();
  }

  pub fn edit(&mut self, entity: Entity) {
    self.dialog.edit(entity);
  }

  /// Close the dialog without waiting on the refetch.
  ///
  /// A returned `DialogClosed` still has to go through
  /// `EntityActions::finish_dialog`, typically from a background task.
  pub fn end_dialog(&mut self, outcome: DialogOutcome) -> Option<DialogClosed> {
    self.dialog.close(outcome)
  }

  /// Close the dialog; refetch and toast when it saved something.
  pub async fn close_dialog(&mut self, outcome: DialogOutcome) -> Option<FetchResult> {
    let closed = self.end_dialog(outcome)?;
    Some(self.actions.finish_dialog(closed).await)
  }

  /// Stop all retrying, including retries a still-running request would
  /// schedule. In-flight requests finish on their own.
  pub fn teardown(&self) {
    self.coordinator().close();
  }
}

impl Drop for EntityModule {
  fn drop(&mut self) {
    self.teardown();
  }
}
