use entab::notify::{Toast, ToastVariant};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the footer bar: breadcrumb on the left, latest toast after it
pub fn draw_footer(frame: &mut Frame, area: Rect, breadcrumb: &[String], toast: Option<&Toast>) {
  let mut spans = vec![Span::raw(" ")];

  for (i, part) in breadcrumb.iter().enumerate() {
    if i > 0 {
      spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
    }

    let style = if i == breadcrumb.len() - 1 {
      Style::default().fg(Color::Cyan).bold()
    } else {
      Style::default().fg(Color::White)
    };

    spans.push(Span::styled(part.clone(), style));
  }

  if let Some(toast) = toast {
    let color = match toast.variant {
      ToastVariant::Default => Color::White,
      ToastVariant::Success => Color::Green,
      ToastVariant::Destructive => Color::Red,
    };
    spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
    spans.push(Span::styled(toast.title.clone(), Style::default().fg(color).bold()));
    if !toast.description.is_empty() {
      spans.push(Span::styled(format!(": {}", toast.description), Style::default().fg(color)));
    }
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}
