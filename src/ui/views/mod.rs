mod cards;
mod entity_tab;
mod kanban;
mod table;

pub use entity_tab::EntityTab;

use entab::config::FieldConfig;
use entab::entity::Entity;
use entab::pipeline::SortConfig;
use entab::selection::SelectionController;

/// Everything a layout needs to draw the current page
pub struct PageContext<'a> {
  pub items: &'a [Entity],
  /// Fields shown as columns or card lines
  pub fields: &'a [FieldConfig],
  pub title_field: Option<&'a str>,
  pub cursor: usize,
  pub selection: &'a SelectionController,
  pub sort: &'a SortConfig,
}

impl PageContext<'_> {
  /// Checkbox prefix while selection mode is on, empty otherwise
  pub fn marker(&self, entity: &Entity) -> &'static str {
    if !self.selection.is_active() {
      return "";
    }
    match entity.id() {
      Some(id) if self.selection.is_selected(&id) => "[x] ",
      _ => "[ ] ",
    }
  }

  pub fn title(&self, entity: &Entity) -> String {
    entity.display_name(self.title_field)
  }
}
