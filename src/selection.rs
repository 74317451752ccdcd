//! Selection-mode state machine for bulk actions.

use std::collections::BTreeSet;

use crate::entity::EntityId;

/// Bulk action a selection is being collected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkIntent {
  Edit,
  Delete,
}

/// Whether the current selection satisfies a bulk action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionCheck {
  Ready(Vec<EntityId>),
  NothingSelected,
  SelectOnlyOne,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ActiveSelection {
  /// Only used for prompt text
  intent: Option<BulkIntent>,
  selected: BTreeSet<EntityId>,
}

/// Tracks selection mode and the set of selected ids.
///
/// The selection is only ever non-empty while selection mode is active.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
  active: Option<ActiveSelection>,
}

impl SelectionController {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active.is_some()
  }

  pub fn intent(&self) -> Option<BulkIntent> {
    self.active.as_ref().and_then(|a| a.intent)
  }

  pub fn selected(&self) -> Option<&BTreeSet<EntityId>> {
    self.active.as_ref().map(|a| &a.selected)
  }

  pub fn len(&self) -> usize {
    self.selected().map_or(0, BTreeSet::len)
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn is_selected(&self, id: &EntityId) -> bool {
    self.selected().is_some_and(|s| s.contains(id))
  }

  /// Selected ids in ascending order, for the UI boundary.
  pub fn ids(&self) -> Vec<EntityId> {
    self.selected().map(|s| s.iter().cloned().collect()).unwrap_or_default()
  }

  /// Enter selection mode with an empty selection.
  pub fn start(&mut self, intent: BulkIntent) {
    self.active = Some(ActiveSelection {
      intent: Some(intent),
      selected: BTreeSet::new(),
    });
  }

  fn selected_mut(&mut self) -> &mut BTreeSet<EntityId> {
    &mut self.active.get_or_insert_with(ActiveSelection::default).selected
  }

  /// Flip one id; toggling while idle enters selection mode.
  pub fn toggle(&mut self, id: EntityId) {
    let selected = self.selected_mut();
    if !selected.remove(&id) {
      selected.insert(id);
    }
  }

  /// Deselect `visible` if all of it is selected, otherwise add all of it.
  ///
  /// Ids outside `visible` are left untouched either way.
  pub fn select_all_visible(&mut self, visible: &[EntityId]) {
    if visible.is_empty() {
      return;
    }
    let selected = self.selected_mut();
    if visible.iter().all(|id| selected.contains(id)) {
      for id in visible {
        selected.remove(id);
      }
    } else {
      selected.extend(visible.iter().cloned());
    }
  }

  /// Leave selection mode and clear the selection.
  pub fn cancel(&mut self) {
    self.active = None;
  }

  /// Check the selection against the requirements of `intent`.
  pub fn check(&self, intent: BulkIntent) -> SelectionCheck {
    let ids = self.ids();
    match (intent, ids.len()) {
      (_, 0) => SelectionCheck::NothingSelected,
      (BulkIntent::Edit, 1) | (BulkIntent::Delete, _) => SelectionCheck::Ready(ids),
      (BulkIntent::Edit, _) => SelectionCheck::SelectOnlyOne,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ids(raw: &[&str]) -> Vec<EntityId> {
    raw.iter().map(|s| EntityId::from(*s)).collect()
  }

  #[test]
  fn test_start_and_cancel() {
    let mut selection = SelectionController::new();
    assert!(!selection.is_active());

    selection.start(BulkIntent::Delete);
    assert!(selection.is_active());
    assert_eq!(selection.intent(), Some(BulkIntent::Delete));
    assert!(selection.is_empty());

    selection.toggle(EntityId::from("1"));
    selection.cancel();
    assert!(!selection.is_active());
    assert!(selection.is_empty());
  }

  #[test]
  fn test_toggle_activates_and_flips() {
    let mut selection = SelectionController::new();
    selection.toggle(EntityId::from("7"));
    assert!(selection.is_active());
    assert_eq!(selection.intent(), None);
    assert!(selection.is_selected(&EntityId::from("7")));

    selection.toggle(EntityId::from("7"));
    assert!(selection.is_active());
    assert!(selection.is_empty());
  }

  #[test]
  fn test_select_all_visible_unions_with_offscreen_ids() {
    let mut selection = SelectionController::new();
    selection.start(BulkIntent::Delete);
    selection.toggle(EntityId::from("99"));

    selection.select_all_visible(&ids(&["1", "2"]));
    assert_eq!(selection.ids(), ids(&["1", "2", "99"]));

    selection.select_all_visible(&ids(&["1", "2"]));
    assert_eq!(selection.ids(), ids(&["99"]));
  }

  #[test]
  fn test_select_all_visible_is_involutive() {
    let mut selection = SelectionController::new();
    selection.start(BulkIntent::Edit);
    selection.toggle(EntityId::from("1"));
    let before = selection.ids();

    // Partially selected page: first call fills it, second clears the page.
    let visible = ids(&["1", "2", "3"]);
    selection.select_all_visible(&visible);
    selection.select_all_visible(&visible);
    assert!(selection.is_empty());

    // Starting from a fully deselected page the pair restores the selection.
    selection.cancel();
    selection.start(BulkIntent::Edit);
    selection.toggle(EntityId::from("8"));
    let before_offpage = selection.ids();
    selection.select_all_visible(&visible);
    selection.select_all_visible(&visible);
    assert_eq!(selection.ids(), before_offpage);
    assert_ne!(before, before_offpage);
  }

  #[test]
  fn test_check_requirements() {
    let mut selection = SelectionController::new();
    selection.start(BulkIntent::Edit);
    assert_eq!(selection.check(BulkIntent::Edit), SelectionCheck::NothingSelected);
    assert_eq!(selection.check(BulkIntent::Delete), SelectionCheck::NothingSelected);

    selection.toggle(EntityId::from("1"));
    assert_eq!(selection.check(BulkIntent::Edit), SelectionCheck::Ready(ids(&["1"])));

    selection.toggle(EntityId::from("2"));
    assert_eq!(selection.check(BulkIntent::Edit), SelectionCheck::SelectOnlyOne);
    assert_eq!(selection.check(BulkIntent::Delete), SelectionCheck::Ready(ids(&["1", "2"])));
  }
}
