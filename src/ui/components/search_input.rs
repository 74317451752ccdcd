use super::input::{InputResult, TextInput};
use super::{overlay_rect, KeyResult};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Events emitted by search input that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
  /// Query changed; emitted on each keystroke
  Changed(String),
  /// Overlay closed, query stays applied
  Submitted,
}

/// Free-text search overlay opened with `/`.
///
/// Reopening starts from the applied query. Escape restores the query that
/// was applied when the overlay opened.
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
  input: TextInput,
  active: bool,
  original: String,
}

impl SearchInput {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  pub fn query(&self) -> String {
    self.input.value()
  }

  pub fn activate(&mut self, current: &str) {
    self.active = true;
    self.original = current.to_string();
    self.input = TextInput::with_value(current);
  }

  /// Handle a key event; `current` is the query applied right now
  pub fn handle_key(&mut self, key: KeyEvent, current: &str) -> KeyResult<SearchEvent> {
    if !self.active {
      if key.code == KeyCode::Char('/') {
        self.activate(current);
        return KeyResult::Handled;
      }
      return KeyResult::NotHandled;
    }

    match self.input.handle_key(key) {
      InputResult::Submitted(_) => {
        self.active = false;
        KeyResult::Event(SearchEvent::Submitted)
      }
      InputResult::Cancelled => {
        self.active = false;
        self.input = TextInput::with_value(&self.original);
        KeyResult::Event(SearchEvent::Changed(self.original.clone()))
      }
      InputResult::Consumed => KeyResult::Event(SearchEvent::Changed(self.input.value())),
      InputResult::NotHandled => KeyResult::Handled,
    }
  }

  /// Render the search overlay if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active {
      return;
    }

    let width = (area.width * 60 / 100).clamp(30, 60);
    let overlay_area = overlay_rect(area, width, 3);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(" Search ");
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let (before, after) = self.input.split_at_cursor();
    let input_line = Line::from(vec![
      Span::styled("/", Style::default().fg(Color::Yellow)),
      Span::raw(before),
      Span::styled("_", Style::default().fg(Color::Yellow)),
      Span::raw(after),
    ]);
    frame.render_widget(Paragraph::new(input_line), inner);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  #[test]
  fn test_typing_emits_changes() {
    let mut search = SearchInput::new();
    assert_eq!(search.handle_key(key(KeyCode::Char('/')), ""), KeyResult::Handled);
    assert_eq!(
      search.handle_key(key(KeyCode::Char('a')), ""),
      KeyResult::Event(SearchEvent::Changed("a".to_string()))
    );
    assert_eq!(search.handle_key(key(KeyCode::Enter), "a"), KeyResult::Event(SearchEvent::Submitted));
    assert!(!search.is_active());
  }

  #[test]
  fn test_escape_restores_previous_query() {
    let mut search = SearchInput::new();
    search.handle_key(key(KeyCode::Char('/')), "berg");
    search.handle_key(key(KeyCode::Char('x')), "berg");
    assert_eq!(
      search.handle_key(key(KeyCode::Esc), "bergx"),
      KeyResult::Event(SearchEvent::Changed("berg".to_string()))
    );
    assert_eq!(search.query(), "berg");
  }
}
