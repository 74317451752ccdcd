use super::KeyResult;
use crate::ui::renderfns::truncate;
use crossterm::event::{KeyCode, KeyEvent};
use entab::config::FilterConfig;
use entab::pipeline::{is_unconstrained, Filters, ALL};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Events emitted by filter bar that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterBarEvent {
  /// User moved the focused filter to a different value
  Changed { name: String, value: String },
}

/// One row of categorical filters.
///
/// Tab moves focus between filters, PageUp/PageDown step through the focused
/// filter's values with "All" first.
#[derive(Debug, Clone, Default)]
pub struct FilterBar {
  filters: Vec<FilterConfig>,
  focused: usize,
}

impl FilterBar {
  pub fn new(filters: Vec<FilterConfig>) -> Self {
    Self { filters, focused: 0 }
  }

  pub fn is_empty(&self) -> bool {
    self.filters.is_empty()
  }

  pub fn focused(&self) -> Option<&FilterConfig> {
    self.filters.get(self.focused)
  }

  /// Position of `current` in "All" + values; unknown values count as "All"
  fn position(filter: &FilterConfig, current: Option<&str>) -> usize {
    match current {
      Some(value) if !is_unconstrained(value) => filter
        .values
        .iter()
        .position(|v| v == value)
        .map(|idx| idx + 1)
        .unwrap_or(0),
      _ => 0,
    }
  }

  fn step(filter: &FilterConfig, current: Option<&str>, direction: i32) -> String {
    let total = filter.values.len() + 1;
    let position = Self::position(filter, current);
    let next = if direction > 0 {
      (position + 1) % total
    } else if position == 0 {
      total - 1
    } else {
      position - 1
    };
    if next == 0 {
      ALL.to_string()
    } else {
      filter.values[next - 1].clone()
    }
  }

  /// Handle a key event against the filters currently applied
  pub fn handle_key(&mut self, key: KeyEvent, applied: &Filters) -> KeyResult<FilterBarEvent> {
    if self.filters.is_empty() {
      return KeyResult::NotHandled;
    }

    let direction = match key.code {
      KeyCode::Tab => {
        self.focused = (self.focused + 1) % self.filters.len();
        return KeyResult::Handled;
      }
      KeyCode::BackTab => {
        self.focused = (self.focused + self.filters.len() - 1) % self.filters.len();
        return KeyResult::Handled;
      }
      KeyCode::PageUp => -1,
      KeyCode::PageDown => 1,
      _ => return KeyResult::NotHandled,
    };

    let filter = &self.filters[self.focused];
    let value = Self::step(filter, applied.get(&filter.name), direction);
    KeyResult::Event(FilterBarEvent::Changed {
      name: filter.name.clone(),
      value,
    })
  }

  /// Render the filter bar
  pub fn render(&self, frame: &mut Frame, area: Rect, applied: &Filters) {
    let Some(filter) = self.focused() else {
      return;
    };
    let selected = Self::position(filter, applied.get(&filter.name));

    let mut spans = vec![Span::styled(
      format!("[{}] ", filter.label()),
      Style::default().fg(Color::Yellow),
    )];

    let tab_style = |is_selected: bool| {
      if is_selected {
        Style::default().fg(Color::Black).bg(Color::Cyan)
      } else {
        Style::default().fg(Color::Gray)
      }
    };

    spans.push(Span::styled(" All ", tab_style(selected == 0)));
    for (idx, value) in filter.values.iter().enumerate() {
      spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
      spans.push(Span::styled(format!(" {} ", truncate(value, 15)), tab_style(selected == idx + 1)));
    }

    // Other constrained filters, so they are not forgotten while unfocused
    let others: Vec<String> = self
      .filters
      .iter()
      .filter(|other| other.name != filter.name && applied.is_constrained(&other.name))
      .filter_map(|other| applied.get(&other.name).map(|v| format!("{}={}", other.label(), v)))
      .collect();
    if !others.is_empty() {
      spans.push(Span::styled(
        format!("  +{}", others.join(" ")),
        Style::default().fg(Color::DarkGray),
      ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn filter(name: &str, values: &[&str]) -> FilterConfig {
    FilterConfig {
      name: name.to_string(),
      label: None,
      values: values.iter().map(|v| v.to_string()).collect(),
      default: None,
    }
  }

  fn bar() -> FilterBar {
    FilterBar::new(vec![
      filter("status", &["active", "inactive"]),
      filter("specialty", &["cardiology"]),
    ])
  }

  fn changed(name: &str, value: &str) -> KeyResult<FilterBarEvent> {
    KeyResult::Event(FilterBarEvent::Changed {
      name: name.to_string(),
      value: value.to_string(),
    })
  }

  #[test]
  fn test_page_down_steps_through_values() {
    let mut bar = bar();
    let applied = Filters::new().with("status", ALL);
    assert_eq!(bar.handle_key(key(KeyCode::PageDown), &applied), changed("status", "active"));

    let applied = Filters::new().with("status", "inactive");
    assert_eq!(bar.handle_key(key(KeyCode::PageDown), &applied), changed("status", ALL));
  }

  #[test]
  fn test_page_up_wraps_to_last_value() {
    let mut bar = bar();
    assert_eq!(bar.handle_key(key(KeyCode::PageUp), &Filters::new()), changed("status", "inactive"));
  }

  #[test]
  fn test_tab_moves_focus() {
    let mut bar = bar();
    assert_eq!(bar.handle_key(key(KeyCode::Tab), &Filters::new()), KeyResult::Handled);
    assert_eq!(bar.focused().map(|f| f.name.as_str()), Some("specialty"));
    assert_eq!(bar.handle_key(key(KeyCode::PageDown), &Filters::new()), changed("specialty", "cardiology"));
  }

  #[test]
  fn test_empty_bar_ignores_keys() {
    let mut bar = FilterBar::default();
    assert_eq!(bar.handle_key(key(KeyCode::Tab), &Filters::new()), KeyResult::NotHandled);
  }
}
