use super::PageContext;
use crate::ui::renderfns::truncate;
use entab::entity::Entity;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

/// Column label for records without a value in the kanban field
pub const NO_VALUE: &str = "(none)";

#[derive(Debug, Clone, PartialEq)]
pub struct KanbanColumn {
  pub name: String,
  pub items: Vec<Entity>,
}

/// Group `items` by `field`.
///
/// Columns for `known` values come first in the given order, even when empty.
/// Other values follow in order of first appearance, then the no-value column.
pub fn group(items: &[Entity], field: &str, known: &[String]) -> Vec<KanbanColumn> {
  let mut columns: Vec<KanbanColumn> = known
    .iter()
    .map(|name| KanbanColumn {
      name: name.clone(),
      items: Vec::new(),
    })
    .collect();
  let mut missing = Vec::new();

  for entity in items {
    let Some(value) = entity.text(field).filter(|v| !v.is_empty()) else {
      missing.push(entity.clone());
      continue;
    };
    match columns.iter_mut().find(|c| c.name == value) {
      Some(column) => column.items.push(entity.clone()),
      None => columns.push(KanbanColumn {
        name: value,
        items: vec![entity.clone()],
      }),
    }
  }

  if !missing.is_empty() {
    columns.push(KanbanColumn {
      name: NO_VALUE.to_string(),
      items: missing,
    });
  }
  columns
}

pub fn render_kanban(
  frame: &mut Frame,
  area: Rect,
  block: Block<'_>,
  columns: &[KanbanColumn],
  selected_column: usize,
  ctx: &PageContext<'_>,
) {
  let inner = block.inner(area);
  frame.render_widget(block, area);

  if columns.is_empty() {
    let paragraph = Paragraph::new("Nothing to group.").style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, inner);
    return;
  }

  let constraints: Vec<Constraint> = columns
    .iter()
    .map(|_| Constraint::Ratio(1, columns.len() as u32))
    .collect();
  let col_areas = Layout::horizontal(constraints).split(inner);

  for (col_idx, column) in columns.iter().enumerate() {
    let is_selected_column = col_idx == selected_column;
    let col_area = col_areas[col_idx];

    let border_color = if is_selected_column { Color::Yellow } else { Color::Blue };
    let title = format!(" {} ({}) ", truncate(&column.name, 12), column.items.len());
    let column_block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(border_color));

    let width = col_area.width.saturating_sub(6) as usize;
    let items: Vec<ListItem> = column
      .items
      .iter()
      .map(|entity| {
        ListItem::new(Line::from(vec![
          Span::styled(ctx.marker(entity), Style::default().fg(Color::Cyan)),
          Span::raw(truncate(&ctx.title(entity), width)),
        ]))
      })
      .collect();

    let list = List::new(items)
      .block(column_block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    if is_selected_column && !column.items.is_empty() {
      let mut state = ListState::default();
      state.select(Some(ctx.cursor.min(column.items.len() - 1)));
      frame.render_stateful_widget(list, col_area, &mut state);
    } else {
      frame.render_widget(list, col_area);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn entity(id: u32, status: Option<&str>) -> Entity {
    Entity::from_value(json!({"id": id, "status": status})).unwrap()
  }

  #[test]
  fn test_group_keeps_known_order_and_empty_columns() {
    let items = vec![entity(1, Some("done")), entity(2, Some("todo")), entity(3, Some("done"))];
    let known = vec!["todo".to_string(), "doing".to_string(), "done".to_string()];
    let columns = group(&items, "status", &known);

    let summary: Vec<(&str, usize)> = columns.iter().map(|c| (c.name.as_str(), c.items.len())).collect();
    assert_eq!(summary, vec![("todo", 1), ("doing", 0), ("done", 2)]);
  }

  #[test]
  fn test_group_appends_unknown_and_missing_values() {
    let items = vec![entity(1, None), entity(2, Some("blocked")), entity(3, Some("todo"))];
    let columns = group(&items, "status", &["todo".to_string()]);

    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["todo", "blocked", NO_VALUE]);
  }
}
