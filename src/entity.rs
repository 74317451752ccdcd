//! Untyped entity records as returned by a back-office SDK.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Field every record is expected to carry as its identity.
pub const ID_FIELD: &str = "id";

/// Field carrying the last modification timestamp.
pub const UPDATED_FIELD: &str = "updated_date";

/// Identity of a record, normalized to a string.
///
/// Backends hand out both numeric and string ids; both compare as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  fn from_value(value: &Value) -> Option<Self> {
    match value {
      Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
      Value::Number(n) => Some(Self(n.to_string())),
      _ => None,
    }
  }
}

impl fmt::Display for EntityId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for EntityId {
  fn from(s: &str) -> Self {
    Self(s.to_string())
  }
}

/// A record of some business type (doctor, tariff, policy, ...).
///
/// The engine only looks at `id` and `updated_date`; everything else is
/// interpreted by filter predicates, sort metadata and the rendering layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(Map<String, Value>);

impl Entity {
  pub fn new(fields: Map<String, Value>) -> Self {
    Self(fields)
  }

  /// Build an entity from a JSON value; only objects qualify.
  pub fn from_value(value: Value) -> Option<Self> {
    match value {
      Value::Object(map) => Some(Self(map)),
      _ => None,
    }
  }

  pub fn id(&self) -> Option<EntityId> {
    self.0.get(ID_FIELD).and_then(EntityId::from_value)
  }

  pub fn updated_date(&self) -> Option<&str> {
    self.0.get(UPDATED_FIELD).and_then(Value::as_str)
  }

  pub fn get(&self, field: &str) -> Option<&Value> {
    self.0.get(field)
  }

  pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
    self.0.insert(field.into(), value)
  }

  pub fn fields(&self) -> &Map<String, Value> {
    &self.0
  }

  /// Field rendered as display text; `None` for null or missing fields.
  pub fn text(&self, field: &str) -> Option<String> {
    self.0.get(field).and_then(value_text)
  }

  /// Human-readable label: the title field if present, otherwise the id.
  pub fn display_name(&self, title_field: Option<&str>) -> String {
    title_field
      .and_then(|f| self.text(f))
      .or_else(|| self.id().map(|id| id.to_string()))
      .unwrap_or_else(|| "(unnamed)".to_string())
  }

  pub fn into_value(self) -> Value {
    Value::Object(self.0)
  }
}

/// Render a scalar JSON value as plain text.
pub fn value_text(value: &Value) -> Option<String> {
  match value {
    Value::Null => None,
    Value::String(s) => Some(s.clone()),
    Value::Bool(b) => Some(b.to_string()),
    Value::Number(n) => Some(n.to_string()),
    other => Some(other.to_string()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn entity(value: Value) -> Entity {
    Entity::from_value(value).unwrap()
  }

  #[test]
  fn test_numeric_and_string_ids_normalize() {
    assert_eq!(entity(json!({"id": 7})).id(), Some(EntityId::new("7")));
    assert_eq!(entity(json!({"id": "abc"})).id(), Some(EntityId::new("abc")));
    assert_eq!(entity(json!({"id": null})).id(), None);
    assert_eq!(entity(json!({"name": "x"})).id(), None);
  }

  #[test]
  fn test_non_objects_are_rejected() {
    assert!(Entity::from_value(json!([1, 2])).is_none());
    assert!(Entity::from_value(json!("doctor")).is_none());
  }

  #[test]
  fn test_display_name_falls_back_to_id() {
    let e = entity(json!({"id": 3, "name": "Dr. Ames"}));
    assert_eq!(e.display_name(Some("name")), "Dr. Ames");
    assert_eq!(e.display_name(Some("missing")), "3");
    assert_eq!(e.display_name(None), "3");
  }

  #[test]
  fn test_text_skips_null() {
    let e = entity(json!({"id": 1, "active": true, "code": null}));
    assert_eq!(e.text("active").as_deref(), Some("true"));
    assert_eq!(e.text("code"), None);
  }
}
