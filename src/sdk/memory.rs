//! In-process SDK holding records in memory.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use super::{EntitySdk, SdkError};
use crate::entity::{Entity, EntityId, ID_FIELD, UPDATED_FIELD};

/// SDK backed by a vector of records.
///
/// Ids are assigned sequentially and `updated_date` is stamped on every write.
#[derive(Debug, Default)]
pub struct MemorySdk {
  records: Mutex<Vec<Entity>>,
  next_id: AtomicU64,
}

impl MemorySdk {
  pub fn new() -> Self {
    Self::default()
  }

  /// Start with the given records; ids present on them are kept.
  pub fn with_records(records: Vec<Entity>) -> Self {
    let next = records
      .iter()
      .filter_map(|r| r.id())
      .filter_map(|id| id.as_str().parse::<u64>().ok())
      .max()
      .unwrap_or(0);
    Self {
      records: Mutex::new(records),
      next_id: AtomicU64::new(next),
    }
  }

  pub fn len(&self) -> usize {
    self.records().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  fn records(&self) -> std::sync::MutexGuard<'_, Vec<Entity>> {
    self.records.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn stamp(entity: &mut Entity) {
    entity.insert(UPDATED_FIELD, Value::String(Utc::now().to_rfc3339()));
  }
}

fn payload_entity(payload: Value) -> Result<Entity, SdkError> {
  Entity::from_value(payload).ok_or_else(|| SdkError::Other("payload must be a JSON object".to_string()))
}

#[async_trait]
impl EntitySdk for MemorySdk {
  async fn list(&self, _sort_hint: Option<&str>) -> Result<Vec<Entity>, SdkError> {
    Ok(self.records().clone())
  }

  async fn create(&self, payload: Value) -> Result<Entity, SdkError> {
    let mut entity = payload_entity(payload)?;
    let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
    entity.insert(ID_FIELD, Value::from(id));
    Self::stamp(&mut entity);
    self.records().push(entity.clone());
    Ok(entity)
  }

  async fn update(&self, id: &EntityId, payload: Value) -> Result<Entity, SdkError> {
    let patch = payload_entity(payload)?;
    let mut records = self.records();
    let record = records
      .iter_mut()
      .find(|r| r.id().as_ref() == Some(id))
      .ok_or_else(|| SdkError::Status {
        status: 404,
        message: format!("record {} not found", id),
      })?;

    for (field, value) in patch.fields() {
      if field != ID_FIELD {
        record.insert(field.clone(), value.clone());
      }
    }
    Self::stamp(record);
    Ok(record.clone())
  }

  async fn delete(&self, id: &EntityId) -> Result<(), SdkError> {
    let mut records = self.records();
    let before = records.len();
    records.retain(|r| r.id().as_ref() != Some(id));
    if records.len() == before {
      return Err(SdkError::Status {
        status: 404,
        message: format!("record {} not found", id),
      });
    }
    Ok(())
  }
}
