use super::PageContext;
use crate::ui::renderfns::{cell_text, truncate, value_color};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Row, Table, TableState};

/// Header label with an arrow on sorted columns
pub fn header_label(label: &str, field: &str, ctx: &PageContext<'_>) -> String {
  match ctx.sort.keys().iter().position(|k| k.id == field) {
    Some(0) => {
      let arrow = if ctx.sort.keys()[0].desc { "▼" } else { "▲" };
      format!("{} {}", label, arrow)
    }
    Some(_) => format!("{} ·", label),
    None => label.to_string(),
  }
}

pub fn render_table(frame: &mut Frame, area: Rect, block: Block<'_>, ctx: &PageContext<'_>) {
  let show_marker = ctx.selection.is_active();

  let mut header_cells = Vec::new();
  if show_marker {
    header_cells.push(Cell::from(""));
  }
  header_cells.extend(
    ctx
      .fields
      .iter()
      .map(|f| Cell::from(header_label(f.label(), &f.name, ctx))),
  );
  let header = Row::new(header_cells).style(Style::default().fg(Color::Yellow).bold());

  let rows: Vec<Row> = ctx
    .items
    .iter()
    .map(|entity| {
      let mut cells = Vec::new();
      if show_marker {
        cells.push(Cell::from(ctx.marker(entity)).style(Style::default().fg(Color::Cyan)));
      }
      cells.extend(ctx.fields.iter().map(|field| {
        let text = cell_text(entity, &field.name);
        let color = value_color(&text);
        Cell::from(truncate(&text, 40)).style(Style::default().fg(color))
      }));
      Row::new(cells)
    })
    .collect();

  let mut widths = Vec::new();
  if show_marker {
    widths.push(Constraint::Length(4));
  }
  let count = ctx.fields.len().max(1) as u32;
  widths.extend(ctx.fields.iter().map(|_| Constraint::Ratio(1, count)));

  let table = Table::new(rows, widths)
    .header(header)
    .block(block)
    .row_highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

  let mut state = TableState::default();
  if !ctx.items.is_empty() {
    state.select(Some(ctx.cursor.min(ctx.items.len() - 1)));
  }
  frame.render_stateful_widget(table, area, &mut state);
}

#[cfg(test)]
mod tests {
  use super::*;
  use entab::pipeline::{SortConfig, SortKey};
  use entab::selection::SelectionController;

  fn label_for(field: &str, sort: &SortConfig) -> String {
    let selection = SelectionController::new();
    let ctx = PageContext {
      items: &[],
      fields: &[],
      title_field: None,
      cursor: 0,
      selection: &selection,
      sort,
    };
    header_label("Name", field, &ctx)
  }

  #[test]
  fn test_header_marks_sort_direction() {
    let sort = SortConfig::new(vec![SortKey::desc("name"), SortKey::asc("city")]);
    assert_eq!(label_for("name", &sort), "Name ▼");
    assert_eq!(label_for("city", &sort), "Name ·");
    assert_eq!(label_for("fee", &sort), "Name");
  }
}
