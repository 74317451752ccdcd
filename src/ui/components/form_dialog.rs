use super::input::{InputResult, TextInput};
use super::{centered_rect, KeyResult};
use crossterm::event::{KeyCode, KeyEvent};
use entab::entity::Entity;
use entab::pipeline::FieldKind;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use serde_json::{Map, Number, Value};

/// Events emitted by the form that parent needs to handle
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
  /// Payload built from the inputs, ready for create/update
  Submitted(Value),
  Cancelled,
}

/// One editable field of the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
  pub name: String,
  pub label: String,
  pub kind: FieldKind,
}

/// Create/edit form shown over the list.
///
/// The form only collects input. The owning view closes it once the save
/// finished, or keeps it open with `set_error` when the save failed.
#[derive(Debug, Clone)]
pub struct FormDialog {
  title: String,
  fields: Vec<FormField>,
  inputs: Vec<TextInput>,
  focused: usize,
  error: Option<String>,
  saving: bool,
}

impl FormDialog {
  /// Form over `fields`, prefilled from `current` when editing
  pub fn new(title: impl Into<String>, fields: Vec<FormField>, current: Option<&Entity>) -> Self {
    let inputs = fields
      .iter()
      .map(|field| {
        let value = current.and_then(|e| e.text(&field.name)).unwrap_or_default();
        TextInput::with_value(&value)
      })
      .collect();
    Self {
      title: title.into(),
      fields,
      inputs,
      focused: 0,
      error: None,
      saving: false,
    }
  }

  pub fn is_saving(&self) -> bool {
    self.saving
  }

  /// Save failed; unlock the form and show why
  pub fn set_error(&mut self, error: impl Into<String>) {
    self.saving = false;
    self.error = Some(error.into());
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  /// Text of a field's input, for display and tests
  pub fn value(&self, name: &str) -> Option<String> {
    self
      .fields
      .iter()
      .position(|f| f.name == name)
      .map(|idx| self.inputs[idx].value())
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<FormEvent> {
    if self.saving {
      return KeyResult::Handled;
    }

    match key.code {
      KeyCode::Tab | KeyCode::Down => {
        if !self.fields.is_empty() {
          self.focused = (self.focused + 1) % self.fields.len();
        }
        return KeyResult::Handled;
      }
      KeyCode::BackTab | KeyCode::Up => {
        if !self.fields.is_empty() {
          self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
        }
        return KeyResult::Handled;
      }
      _ => {}
    }

    let Some(input) = self.inputs.get_mut(self.focused) else {
      return match key.code {
        KeyCode::Esc => KeyResult::Event(FormEvent::Cancelled),
        _ => KeyResult::Handled,
      };
    };

    match input.handle_key(key) {
      InputResult::Cancelled => KeyResult::Event(FormEvent::Cancelled),
      InputResult::Submitted(_) => match self.payload() {
        Ok(payload) => {
          self.error = None;
          self.saving = true;
          KeyResult::Event(FormEvent::Submitted(payload))
        }
        Err(e) => {
          self.error = Some(e);
          KeyResult::Handled
        }
      },
      InputResult::Consumed | InputResult::NotHandled => KeyResult::Handled,
    }
  }

  fn payload(&self) -> Result<Value, String> {
    let mut map = Map::new();
    for (field, input) in self.fields.iter().zip(&self.inputs) {
      map.insert(field.name.clone(), convert(field, &input.value())?);
    }
    Ok(Value::Object(map))
  }

  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    let height = (self.fields.len() as u16) * 2 + 4;
    let width = (area.width * 60 / 100).clamp(40, 80);
    let overlay_area = centered_rect(area, width, height);

    frame.render_widget(Clear, overlay_area);

    let border_color = if self.error.is_some() { Color::Red } else { Color::Yellow };
    let title = if self.saving {
      format!(" {} (saving...) ", self.title)
    } else {
      format!(" {} ", self.title)
    };
    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(border_color))
      .title(title)
      .title_bottom(Line::from(" Tab next  Enter save  Esc cancel ").right_aligned());
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let mut lines = Vec::new();
    for (idx, (field, input)) in self.fields.iter().zip(&self.inputs).enumerate() {
      let focused = idx == self.focused;
      let label_style = if focused {
        Style::default().fg(Color::Cyan).bold()
      } else {
        Style::default().fg(Color::Gray)
      };
      lines.push(Line::from(Span::styled(field.label.clone(), label_style)));

      let (before, after) = input.split_at_cursor();
      let mut spans = vec![Span::raw("  "), Span::raw(before)];
      if focused {
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
      }
      spans.push(Span::raw(after));
      lines.push(Line::from(spans));
    }

    if let Some(error) = &self.error {
      lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red))));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
  }
}

/// Turn one input into a JSON value of the field's kind.
///
/// Empty inputs become null except for text fields.
fn convert(field: &FormField, raw: &str) -> Result<Value, String> {
  let raw = raw.trim();
  if raw.is_empty() {
    return Ok(match field.kind {
      FieldKind::Text => Value::String(String::new()),
      _ => Value::Null,
    });
  }

  match field.kind {
    FieldKind::Text | FieldKind::Date => Ok(Value::String(raw.to_string())),
    FieldKind::Number => {
      let number = if let Ok(int) = raw.parse::<i64>() {
        Some(Number::from(int))
      } else {
        raw.parse::<f64>().ok().and_then(Number::from_f64)
      };
      number
        .map(Value::Number)
        .ok_or_else(|| format!("{} must be a number", field.label))
    }
    FieldKind::Boolean => match raw.to_lowercase().as_str() {
      "true" | "yes" | "y" | "1" => Ok(Value::Bool(true)),
      "false" | "no" | "n" | "0" => Ok(Value::Bool(false)),
      _ => Err(format!("{} must be yes or no", field.label)),
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;
  use serde_json::json;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn field(name: &str, kind: FieldKind) -> FormField {
    FormField {
      name: name.to_string(),
      label: name.to_string(),
      kind,
    }
  }

  fn form(current: Option<&Entity>) -> FormDialog {
    FormDialog::new(
      "Tariff",
      vec![
        field("code", FieldKind::Text),
        field("price", FieldKind::Number),
        field("active", FieldKind::Boolean),
      ],
      current,
    )
  }

  fn type_str(form: &mut FormDialog, text: &str) {
    for c in text.chars() {
      form.handle_key(key(KeyCode::Char(c)));
    }
  }

  #[test]
  fn test_submit_builds_typed_payload() {
    let mut form = form(None);
    type_str(&mut form, "T-1");
    form.handle_key(key(KeyCode::Tab));
    type_str(&mut form, "12.5");
    form.handle_key(key(KeyCode::Tab));
    type_str(&mut form, "yes");

    assert_eq!(
      form.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(FormEvent::Submitted(json!({"code": "T-1", "price": 12.5, "active": true})))
    );
    assert!(form.is_saving());
  }

  #[test]
  fn test_invalid_number_keeps_form_open() {
    let mut form = form(None);
    form.handle_key(key(KeyCode::Tab));
    type_str(&mut form, "abc");

    assert_eq!(form.handle_key(key(KeyCode::Enter)), KeyResult::Handled);
    assert_eq!(form.error(), Some("price must be a number"));
    assert!(!form.is_saving());
  }

  #[test]
  fn test_edit_prefills_and_empty_becomes_null() {
    let current = Entity::from_value(json!({"id": 1, "code": "T-9", "price": 3})).unwrap();
    let form = form(Some(&current));
    assert_eq!(form.value("code").as_deref(), Some("T-9"));
    assert_eq!(form.value("price").as_deref(), Some("3"));
    assert_eq!(form.payload().unwrap(), json!({"code": "T-9", "price": 3, "active": null}));
  }

  #[test]
  fn test_keys_ignored_while_saving_until_error() {
    let mut form = form(None);
    form.handle_key(key(KeyCode::Enter));
    assert!(form.is_saving());
    assert_eq!(form.handle_key(key(KeyCode::Esc)), KeyResult::Handled);

    form.set_error("Conflict");
    assert_eq!(form.handle_key(key(KeyCode::Esc)), KeyResult::Event(FormEvent::Cancelled));
  }
}
