use crate::ui::view::ShortcutInfo;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the header bar with title, tab strip and shortcuts
pub fn draw_header(
  frame: &mut Frame,
  area: Rect,
  title: &str,
  tabs: &[String],
  active_tab: usize,
  shortcuts: &[ShortcutInfo],
) {
  let mut spans = vec![
    Span::styled(format!(" {} ", title), Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
  ];

  for (idx, tab) in tabs.iter().enumerate() {
    let style = if idx == active_tab {
      Style::default().fg(Color::Yellow).bold()
    } else {
      Style::default().fg(Color::Gray)
    };
    spans.push(Span::styled(format!(" {} ", tab), style));
  }

  spans.push(Span::raw("  "));
  spans.extend(shortcut_spans(shortcuts));

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}

/// Keys and brackets highlighted, descriptions dimmed, lowest priority first
fn shortcut_spans(shortcuts: &[ShortcutInfo]) -> Vec<Span<'static>> {
  let mut visible: Vec<&ShortcutInfo> = shortcuts.iter().collect();
  visible.sort_by_key(|s| s.priority);

  let mut spans = Vec::new();
  for (i, shortcut) in visible.into_iter().enumerate() {
    if i > 0 {
      spans.push(Span::raw("  "));
    }
    spans.push(Span::styled(format!("<{}>", shortcut.key), Style::default().fg(Color::Cyan)));
    spans.push(Span::styled(format!(" {}", shortcut.label), Style::default().fg(Color::DarkGray)));
  }
  spans
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_shortcuts_sorted_by_priority() {
    let shortcuts = vec![
      ShortcutInfo::new("q", "quit").with_priority(90),
      ShortcutInfo::new(":", "command").with_priority(10),
    ];
    let text: String = shortcut_spans(&shortcuts)
      .iter()
      .map(|s| s.content.as_ref())
      .collect();
    assert_eq!(text, "<:> command  <q> quit");
  }
}
