use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use super::config::EntityConfig;
use crate::bulk::{self, BulkOutcome};
use crate::cache::{CacheCoordinator, FetchResult, ListSource};
use crate::dialog::DialogClosed;
use crate::entity::{Entity, EntityId};
use crate::mutation::{EntityMutated, MutationKind};
use crate::notify::{Notifier, Toast, ToastVariant};
use crate::sdk::SdkError;

/// Async operations of one engine, detached from its UI state.
///
/// Cheap to clone; clones share the engine's cache and notifier.
#[derive(Clone)]
pub struct EntityActions {
  source: ListSource,
  coordinator: CacheCoordinator,
  notifier: Arc<dyn Notifier>,
  entity_name: String,
  entity_name_plural: String,
}

impl EntityActions {
  pub(super) fn new(config: &EntityConfig, coordinator: CacheCoordinator, notifier: Arc<dyn Notifier>) -> Self {
    let source = ListSource {
      key: config.key.clone(),
      sdk: Arc::clone(&config.sdk),
      sort_hint: config.sort_hint.clone(),
      ttl: config.ttl.unwrap_or(coordinator.settings().default_ttl),
    };
    Self {
      source,
      coordinator,
      notifier,
      entity_name: config.entity_name.clone(),
      entity_name_plural: config.entity_name_plural.clone(),
    }
  }

  pub fn key(&self) -> &str {
    &self.source.key
  }

  pub fn source(&self) -> &ListSource {
    &self.source
  }

  pub fn coordinator(&self) -> &CacheCoordinator {
    &self.coordinator
  }

  fn noun(&self, count: usize) -> &str {
    if count == 1 {
      &self.entity_name
    } else {
      &self.entity_name_plural
    }
  }

  /// Load the list through the cache.
  pub async fn refresh(&self, force: bool) -> FetchResult {
    self.coordinator.fetch(&self.source, force).await
  }

  async fn announce(&self, kind: MutationKind) -> FetchResult {
    let event = EntityMutated::new(self.source.key.clone(), kind);
    match self.coordinator.on_mutated(&event).await {
      Some(result) => result,
      None => self.refresh(true).await,
    }
  }

  /// Toast a dialog save and refetch the list.
  pub async fn finish_dialog(&self, closed: DialogClosed) -> FetchResult {
    let kind = closed.event.kind;
    let name = closed
      .display_name
      .unwrap_or_else(|| self.entity_name.clone());
    self.notifier.toast(Toast::new(
      format!("{} {}", self.entity_name, kind),
      format!("{} has been {} successfully.", name, kind),
      ToastVariant::Success,
    ));
    self.announce(kind).await
  }

  /// Create or update one record.
  pub async fn save(&self, id: Option<&EntityId>, payload: Value) -> Result<Entity, SdkError> {
    let result = match id {
      Some(id) => self.source.sdk.update(id, payload).await,
      None => self.source.sdk.create(payload).await,
    };
    if let Err(e) = &result {
      warn!(key = %self.source.key, error = %e, "save failed");
    }
    result
  }

  /// Delete `ids` one by one, toast a summary, refresh if anything changed.
  pub async fn delete_all(&self, ids: &[EntityId]) -> BulkOutcome {
    let outcome = bulk::delete_each(self.source.sdk.as_ref(), ids).await;
    self.report(MutationKind::Delete, &outcome).await;
    outcome
  }

  /// Create one record per payload, toast a summary, refresh if anything changed.
  pub async fn import_all(&self, payloads: Vec<Value>) -> BulkOutcome {
    let outcome = bulk::create_each(self.source.sdk.as_ref(), payloads).await;
    self.report(MutationKind::Import, &outcome).await;
    outcome
  }

  async fn report(&self, kind: MutationKind, outcome: &BulkOutcome) {
    info!(
      key = %self.source.key,
      %kind,
      succeeded = outcome.success_count,
      failed = outcome.fail_count,
      "bulk run finished"
    );
    self.notifier.toast(self.summary(kind, outcome));

    if outcome.any_succeeded() {
      if let Err(e) = self.announce(kind).await {
        warn!(key = %self.source.key, error = %e, "refresh after bulk run failed");
      }
    }
  }

  fn summary(&self, kind: MutationKind, outcome: &BulkOutcome) -> Toast {
    let done = outcome.success_count;
    let failed = outcome.fail_count;
    if failed == 0 {
      Toast::new(
        format!("{} {}", capitalize(self.noun(done)), kind),
        format!("{} {} {}.", done, self.noun(done).to_lowercase(), kind),
        ToastVariant::Success,
      )
    } else if done == 0 {
      Toast::new(
        format!("{} failed", Verb(kind)),
        format!("{} {} could not be {}.", failed, self.noun(failed).to_lowercase(), kind),
        ToastVariant::Destructive,
      )
    } else {
      Toast::new(
        format!("{} partially completed", Verb(kind)),
        format!("{} {}, {} failed.", done, kind, failed),
        ToastVariant::Default,
      )
    }
  }
}

/// Imperative form of a mutation kind, for toast titles.
struct Verb(MutationKind);

impl fmt::Display for Verb {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self.0 {
      MutationKind::Create => "Create",
      MutationKind::Update => "Update",
      MutationKind::Delete => "Delete",
      MutationKind::Import => "Import",
    })
  }
}

fn capitalize(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}
