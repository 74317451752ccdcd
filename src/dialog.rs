//! Open/closed lifecycle of the create/edit dialog.

use crate::entity::Entity;
use crate::mutation::{EntityMutated, MutationKind};

/// Whether the dialog creates a new record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMode {
  Create,
  Edit,
}

#[derive(Debug, Clone, Default, PartialEq)]
enum DialogState {
  #[default]
  Closed,
  Open { current: Option<Entity> },
}

/// What the dialog reports back when it closes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogOutcome {
  /// The dialog wrote something and the list should be refetched
  pub refresh_needed: bool,
  pub operation: Option<MutationKind>,
  /// Label of the record that was written, used in the success toast
  pub display_name: Option<String>,
}

impl DialogOutcome {
  /// Dialog dismissed without writing anything.
  pub fn dismissed() -> Self {
    Self::default()
  }

  /// Dialog saved a record.
  pub fn saved(operation: MutationKind, display_name: impl Into<String>) -> Self {
    Self {
      refresh_needed: true,
      operation: Some(operation),
      display_name: Some(display_name.into()),
    }
  }
}

/// Follow-up work after a dialog closed with changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogClosed {
  pub event: EntityMutated,
  pub display_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DialogController {
  entity_key: String,
  state: DialogState,
}

impl DialogController {
  pub fn new(entity_key: impl Into<String>) -> Self {
    Self {
      entity_key: entity_key.into(),
      state: DialogState::Closed,
    }
  }

  pub fn is_open(&self) -> bool {
    matches!(self.state, DialogState::Open { .. })
  }

  /// Record being edited; `None` while closed or creating.
  pub fn current_item(&self) -> Option<&Entity> {
    match &self.state {
      DialogState::Open { current } => current.as_ref(),
      DialogState::Closed => None,
    }
  }

  pub fn mode(&self) -> Option<DialogMode> {
    match &self.state {
      DialogState::Open { current: Some(_) } => Some(DialogMode::Edit),
      DialogState::Open { current: None } => Some(DialogMode::Create),
      DialogState::Closed => None,
    }
  }

  pub fn add_new(&mut self) {
    self.state = DialogState::Open { current: None };
  }

  pub fn edit(&mut self, entity: Entity) {
    self.state = DialogState::Open {
      current: Some(entity),
    };
  }

  /// Close the dialog. Returns the mutation to announce when the outcome
  /// asks for a refresh.
  pub fn close(&mut self, outcome: DialogOutcome) -> Option<DialogClosed> {
    let mode = self.mode();
    self.state = DialogState::Closed;

    if !outcome.refresh_needed {
      return None;
    }
    let kind = outcome.operation.unwrap_or(match mode {
      Some(DialogMode::Edit) => MutationKind::Update,
      _ => MutationKind::Create,
    });
    Some(DialogClosed {
      event: EntityMutated::new(self.entity_key.clone(), kind),
      display_name: outcome.display_name,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn tariff() -> Entity {
    Entity::from_value(json!({"id": 3, "code": "T-3"})).unwrap()
  }

  #[test]
  fn test_modes_follow_current_item() {
    let mut dialog = DialogController::new("tariffs");
    assert!(!dialog.is_open());
    assert_eq!(dialog.mode(), None);

    dialog.add_new();
    assert!(dialog.is_open());
    assert_eq!(dialog.mode(), Some(DialogMode::Create));
    assert!(dialog.current_item().is_none());

    dialog.edit(tariff());
    assert_eq!(dialog.mode(), Some(DialogMode::Edit));
    assert_eq!(dialog.current_item(), Some(&tariff()));
  }

  #[test]
  fn test_dismiss_closes_without_event() {
    let mut dialog = DialogController::new("tariffs");
    dialog.edit(tariff());
    assert_eq!(dialog.close(DialogOutcome::dismissed()), None);
    assert!(!dialog.is_open());
    assert!(dialog.current_item().is_none());
  }

  #[test]
  fn test_save_emits_mutation_for_key() {
    let mut dialog = DialogController::new("tariffs");
    dialog.add_new();
    let closed = dialog
      .close(DialogOutcome::saved(MutationKind::Create, "T-9"))
      .unwrap();
    assert_eq!(closed.event, EntityMutated::new("tariffs", MutationKind::Create));
    assert_eq!(closed.display_name.as_deref(), Some("T-9"));
    assert!(!dialog.is_open());
  }

  #[test]
  fn test_missing_operation_inferred_from_mode() {
    let mut dialog = DialogController::new("tariffs");
    dialog.edit(tariff());
    let outcome = DialogOutcome {
      refresh_needed: true,
      operation: None,
      display_name: None,
    };
    let closed = dialog.close(outcome).unwrap();
    assert_eq!(closed.event.kind, MutationKind::Update);
  }
}
