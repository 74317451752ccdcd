//! Events announcing that records of an entity type changed on the backend.

use std::fmt;

/// Kind of change that happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
  Create,
  Update,
  Delete,
  Import,
}

impl fmt::Display for MutationKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self {
      MutationKind::Create => "created",
      MutationKind::Update => "updated",
      MutationKind::Delete => "deleted",
      MutationKind::Import => "imported",
    };
    f.write_str(label)
  }
}

/// Emitted after a successful write so the cache can refetch the key.
///
/// Writers (dialogs, bulk actions) only produce this event; the cache
/// coordinator decides what refreshing means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMutated {
  pub entity_key: String,
  pub kind: MutationKind,
}

impl EntityMutated {
  pub fn new(entity_key: impl Into<String>, kind: MutationKind) -> Self {
    Self {
      entity_key: entity_key.into(),
      kind,
    }
  }
}
