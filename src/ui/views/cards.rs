use super::PageContext;
use crate::ui::renderfns::{cell_text, truncate, value_color};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

const CARD_WIDTH: u16 = 32;
/// Field lines shown under the card title
const CARD_LINES: usize = 3;

/// Cards per row for the given width
pub fn cards_per_row(width: u16) -> usize {
  (width / CARD_WIDTH).max(1) as usize
}

pub fn render_cards(frame: &mut Frame, area: Rect, block: Block<'_>, ctx: &PageContext<'_>) {
  let inner = block.inner(area);
  frame.render_widget(block, area);

  let per_row = cards_per_row(inner.width);
  let card_height = CARD_LINES as u16 + 2;
  let rows = ctx.items.len().div_ceil(per_row);

  let row_areas = Layout::vertical(vec![Constraint::Length(card_height); rows]).split(inner);
  for (row_idx, row_area) in row_areas.iter().enumerate() {
    let col_areas = Layout::horizontal(vec![Constraint::Ratio(1, per_row as u32); per_row]).split(*row_area);
    for (col_idx, card_area) in col_areas.iter().enumerate() {
      let idx = row_idx * per_row + col_idx;
      let Some(entity) = ctx.items.get(idx) else {
        break;
      };

      let border_color = if idx == ctx.cursor { Color::Yellow } else { Color::Blue };
      let title = format!(
        " {}{} ",
        ctx.marker(entity),
        truncate(&ctx.title(entity), card_area.width.saturating_sub(8) as usize)
      );
      let card = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

      let lines: Vec<Line> = ctx
        .fields
        .iter()
        .filter(|f| Some(f.name.as_str()) != ctx.title_field)
        .take(CARD_LINES)
        .map(|field| {
          let text = cell_text(entity, &field.name);
          Line::from(vec![
            Span::styled(format!("{}: ", field.label()), Style::default().fg(Color::DarkGray)),
            Span::styled(text.clone(), Style::default().fg(value_color(&text))),
          ])
        })
        .collect();

      frame.render_widget(Paragraph::new(lines).block(card), *card_area);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_cards_per_row() {
    assert_eq!(cards_per_row(10), 1);
    assert_eq!(cards_per_row(64), 2);
    assert_eq!(cards_per_row(100), 3);
  }
}
