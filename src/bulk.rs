//! Sequential bulk writes that collect per-item failures.

use serde_json::Value;
use tracing::{debug, warn};

use crate::entity::EntityId;
use crate::sdk::EntitySdk;

/// One item that could not be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkFailure {
  /// Id of the record, or the position of an imported payload
  pub label: String,
  pub message: String,
}

/// Aggregate result of a bulk run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkOutcome {
  pub success_count: usize,
  pub fail_count: usize,
  pub failures: Vec<BulkFailure>,
}

impl BulkOutcome {
  fn record(&mut self, label: String, result: Result<(), String>) {
    match result {
      Ok(()) => self.success_count += 1,
      Err(message) => {
        self.fail_count += 1;
        self.failures.push(BulkFailure { label, message });
      }
    }
  }

  pub fn total(&self) -> usize {
    self.success_count + self.fail_count
  }

  pub fn any_succeeded(&self) -> bool {
    self.success_count > 0
  }
}

/// Delete `ids` one at a time. A failed delete does not stop the run.
pub async fn delete_each(sdk: &dyn EntitySdk, ids: &[EntityId]) -> BulkOutcome {
  let mut outcome = BulkOutcome::default();
  for id in ids {
    let result = sdk.delete(id).await.map_err(|e| {
      warn!(id = %id, error = %e, "bulk delete failed");
      e.to_string()
    });
    outcome.record(id.to_string(), result);
  }
  debug!(
    succeeded = outcome.success_count,
    failed = outcome.fail_count,
    "bulk delete finished"
  );
  outcome
}

/// Create one record per payload, in order.
pub async fn create_each(sdk: &dyn EntitySdk, payloads: Vec<Value>) -> BulkOutcome {
  let mut outcome = BulkOutcome::default();
  for (index, payload) in payloads.into_iter().enumerate() {
    let label = format!("#{}", index + 1);
    let result = sdk.create(payload).await.map(drop).map_err(|e| {
      warn!(row = %label, error = %e, "import failed");
      e.to_string()
    });
    outcome.record(label, result);
  }
  debug!(
    succeeded = outcome.success_count,
    failed = outcome.fail_count,
    "import finished"
  );
  outcome
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::entity::Entity;
  use crate::sdk::MemorySdk;
  use serde_json::json;

  fn policies() -> MemorySdk {
    MemorySdk::with_records(
      (1..=4)
        .filter_map(|i| Entity::from_value(json!({"id": i, "number": format!("P-{}", i)})))
        .collect(),
    )
  }

  #[tokio::test]
  async fn test_delete_each_continues_after_failure() {
    let sdk = policies();
    let ids: Vec<EntityId> = ["1", "404", "3"].into_iter().map(EntityId::from).collect();

    let outcome = delete_each(&sdk, &ids).await;

    assert_eq!(outcome.success_count, 2);
    assert_eq!(outcome.fail_count, 1);
    assert_eq!(outcome.failures[0].label, "404");
    assert_eq!(sdk.len(), 2);
  }

  #[tokio::test]
  async fn test_create_each_creates_in_order() {
    let sdk = MemorySdk::new();
    let payloads = vec![json!({"name": "a"}), json!({"name": "b"})];

    let outcome = create_each(&sdk, payloads).await;

    assert_eq!(outcome.total(), 2);
    assert!(outcome.failures.is_empty());
    let names: Vec<String> = sdk
      .list(None)
      .await
      .unwrap()
      .iter()
      .filter_map(|e| e.text("name"))
      .collect();
    assert_eq!(names, ["a", "b"]);
  }

  #[tokio::test]
  async fn test_empty_run_reports_nothing() {
    let outcome = delete_each(&policies(), &[]).await;
    assert_eq!(outcome, BulkOutcome::default());
    assert!(!outcome.any_succeeded());
  }
}
