use entab::entity::Entity;
use ratatui::prelude::Color;
use serde_json::Value;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Text shown for one field of a record; "-" when missing or null
pub fn cell_text(entity: &Entity, field: &str) -> String {
  match entity.get(field) {
    Some(Value::Bool(true)) => "yes".to_string(),
    Some(Value::Bool(false)) => "no".to_string(),
    _ => entity.text(field).unwrap_or_else(|| "-".to_string()),
  }
}

/// Display color for common status-like values
pub fn value_color(value: &str) -> Color {
  match value.to_lowercase().as_str() {
    "active" | "done" | "approved" | "paid" | "yes" => Color::Green,
    "pending" | "draft" | "in progress" | "review" => Color::Yellow,
    "inactive" | "cancelled" | "rejected" | "overdue" | "no" => Color::Red,
    _ => Color::White,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
  }

  #[test]
  fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_truncate_counts_chars() {
    assert_eq!(truncate("Zoë Müller-Lüdenscheidt", 10), "Zoë Mül...");
  }

  #[test]
  fn test_cell_text() {
    let entity = Entity::from_value(json!({"id": 1, "active": true, "fee": 12.5, "note": null})).unwrap();
    assert_eq!(cell_text(&entity, "active"), "yes");
    assert_eq!(cell_text(&entity, "fee"), "12.5");
    assert_eq!(cell_text(&entity, "note"), "-");
    assert_eq!(cell_text(&entity, "missing"), "-");
  }

  #[test]
  fn test_value_color() {
    assert_eq!(value_color("Active"), Color::Green);
    assert_eq!(value_color("draft"), Color::Yellow);
    assert_eq!(value_color("inactive"), Color::Red);
    assert_eq!(value_color("cardiology"), Color::White);
  }
}
