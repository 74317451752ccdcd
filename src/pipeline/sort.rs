use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::entity::Entity;

/// How a field's values compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
  #[default]
  Text,
  Date,
  Boolean,
  Number,
}

/// Per-field type metadata used by the comparator.
///
/// Fields not declared here are compared by the JSON type of their value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSchema(HashMap<String, FieldKind>);

impl FieldSchema {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with(mut self, field: impl Into<String>, kind: FieldKind) -> Self {
    self.0.insert(field.into(), kind);
    self
  }

  pub fn kind(&self, field: &str) -> Option<FieldKind> {
    self.0.get(field).copied()
  }
}

/// One sort criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
  pub id: String,
  #[serde(default)]
  pub desc: bool,
}

impl SortKey {
  pub fn asc(id: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      desc: false,
    }
  }

  pub fn desc(id: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      desc: true,
    }
  }
}

/// Ordered sort criteria; the first entry is the primary key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortConfig(pub Vec<SortKey>);

impl SortConfig {
  pub fn new(keys: Vec<SortKey>) -> Self {
    Self(keys)
  }

  pub fn primary(&self) -> Option<&SortKey> {
    self.0.first()
  }

  pub fn keys(&self) -> &[SortKey] {
    &self.0
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

/// Comparable projection of a field value.
#[derive(Debug, Clone, PartialEq)]
enum SortValue {
  Bool(u8),
  Number(f64),
  Date(i64),
  Text(String),
}

impl SortValue {
  fn rank(&self) -> u8 {
    match self {
      SortValue::Bool(_) => 0,
      SortValue::Number(_) => 1,
      SortValue::Date(_) => 2,
      SortValue::Text(_) => 3,
    }
  }

  fn compare(&self, other: &Self) -> Ordering {
    match (self, other) {
      (SortValue::Bool(a), SortValue::Bool(b)) => a.cmp(b),
      (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
      (SortValue::Date(a), SortValue::Date(b)) => a.cmp(b),
      (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
      _ => self.rank().cmp(&other.rank()),
    }
  }
}

/// Parse the date formats back-office records use; `None` if unparsable.
pub fn parse_timestamp(raw: &str) -> Option<i64> {
  let raw = raw.trim();
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Some(dt.timestamp_millis());
  }
  for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
      return Some(dt.and_utc().timestamp_millis());
    }
  }
  NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .ok()
    .and_then(|d| d.and_hms_opt(0, 0, 0))
    .map(|dt| dt.and_utc().timestamp_millis())
}

fn sort_value(entity: &Entity, field: &str, kind: Option<FieldKind>) -> Option<SortValue> {
  let value = entity.get(field)?;
  match (kind, value) {
    (_, Value::Null) => None,
    (Some(FieldKind::Date), Value::String(s)) => parse_timestamp(s).map(SortValue::Date),
    (Some(FieldKind::Date), Value::Number(n)) => n.as_i64().map(SortValue::Date),
    (Some(FieldKind::Date), _) => None,
    (Some(FieldKind::Number), Value::String(s)) => s.trim().parse().ok().map(SortValue::Number),
    (Some(FieldKind::Boolean), Value::String(s)) => s.trim().parse::<bool>().ok().map(|b| SortValue::Bool(b as u8)),
    (_, Value::Bool(b)) => Some(SortValue::Bool(*b as u8)),
    (_, Value::Number(n)) => n.as_f64().map(SortValue::Number),
    (_, Value::String(s)) => Some(SortValue::Text(s.to_lowercase())),
    (_, other) => Some(SortValue::Text(other.to_string().to_lowercase())),
  }
}

/// Compare two records under the sort configuration.
///
/// Missing and unparsable values sort last in either direction.
pub fn compare_entities(a: &Entity, b: &Entity, sort: &SortConfig, schema: &FieldSchema) -> Ordering {
  for key in sort.keys() {
    let kind = schema.kind(&key.id);
    let ordering = match (sort_value(a, &key.id, kind), sort_value(b, &key.id, kind)) {
      (None, None) => Ordering::Equal,
      (None, Some(_)) => Ordering::Greater,
      (Some(_), None) => Ordering::Less,
      (Some(x), Some(y)) => {
        let ord = x.compare(&y);
        if key.desc {
          ord.reverse()
        } else {
          ord
        }
      }
    };
    if ordering != Ordering::Equal {
      return ordering;
    }
  }
  Ordering::Equal
}

/// Stable sort of already filtered records.
pub fn sort_items(items: &mut [&Entity], sort: &SortConfig, schema: &FieldSchema) {
  if sort.is_empty() {
    return;
  }
  items.sort_by(|a, b| compare_entities(a, b, sort, schema));
}
