mod command_input;
mod filter_bar;
mod footer;
mod form_dialog;
mod input;
mod key_result;
mod search_input;

pub use command_input::{CommandEvent, CommandInput};
pub use filter_bar::{FilterBar, FilterBarEvent};
pub use footer::draw_footer;
pub use form_dialog::{FormDialog, FormEvent, FormField};
pub use key_result::KeyResult;
pub use search_input::{SearchEvent, SearchInput};

use ratatui::layout::Rect;

/// Overlay anchored to the top-left of `area`, shrunk to fit inside it
pub fn overlay_rect(area: Rect, width: u16, height: u16) -> Rect {
  let x = area.x.saturating_add(1).min(area.right());
  let y = area.y.saturating_add(1).min(area.bottom());
  Rect {
    x,
    y,
    width: width.min(area.right().saturating_sub(x)),
    height: height.min(area.bottom().saturating_sub(y)),
  }
}

/// Overlay centered in `area`, shrunk to fit inside it
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  Rect {
    x: area.x + (area.width - width) / 2,
    y: area.y + (area.height - height) / 2,
    width,
    height,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_overlay_rect_clamps_to_area() {
    let area = Rect::new(0, 0, 20, 5);
    assert_eq!(overlay_rect(area, 60, 10), Rect::new(1, 1, 19, 4));
    assert_eq!(overlay_rect(area, 10, 3), Rect::new(1, 1, 10, 3));
  }

  #[test]
  fn test_centered_rect() {
    let area = Rect::new(0, 0, 40, 20);
    assert_eq!(centered_rect(area, 20, 10), Rect::new(10, 5, 20, 10));
    assert_eq!(centered_rect(area, 80, 30), area);
  }
}
