pub mod components;
pub mod renderfns;
pub mod view;
pub mod views;

use crate::app::App;
use crate::ui::components::draw_footer;
use crate::ui::renderfns::draw_header;
use crate::ui::view::View;
use ratatui::prelude::*;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Current tab
      Constraint::Length(1), // Footer
    ])
    .split(frame.area());

  let title = app.title().to_string();
  let labels = app.tab_labels();
  let active = app.active_index();
  let toast = app.toast().cloned();

  let view = app.current_view();
  draw_header(frame, chunks[0], &title, &labels, active, &view.shortcuts());
  view.render(frame, chunks[1]);
  let breadcrumb = vec![title, view.breadcrumb_label()];

  draw_footer(frame, chunks[2], &breadcrumb, toast.as_ref());
  app.command().render_overlay(frame, chunks[1]);
}
