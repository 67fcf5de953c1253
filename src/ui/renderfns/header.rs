use crate::query::LoadState;
use crate::ui::view::ShortcutInfo;
use chrono::{Local, TimeZone};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the header bar: title, load status, and the view's shortcuts
pub fn draw_header(
  frame: &mut Frame,
  area: Rect,
  title: &str,
  state: &LoadState,
  last_refreshed: Option<i64>,
  shortcuts: &[ShortcutInfo],
) {
  let mut spans = vec![
    Span::styled(" deckview ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", title), Style::default().fg(Color::White)),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
  ];

  let (status, color) = status_label(state, last_refreshed);
  spans.push(Span::styled(format!(" {} ", status), Style::default().fg(color)));
  spans.push(Span::raw(" "));

  let mut shortcuts: Vec<&ShortcutInfo> = shortcuts.iter().collect();
  shortcuts.sort_by_key(|s| s.priority);
  for shortcut in shortcuts {
    spans.push(Span::styled(
      format!("<{}>", shortcut.key),
      Style::default().fg(Color::Cyan),
    ));
    spans.push(Span::styled(
      format!(" {}   ", shortcut.label),
      Style::default().fg(Color::DarkGray),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}

fn status_label(state: &LoadState, last_refreshed: Option<i64>) -> (String, Color) {
  match state {
    LoadState::Loading => ("loading...".to_string(), Color::Yellow),
    LoadState::Error(_) => ("load failed".to_string(), Color::Red),
    LoadState::Idle | LoadState::Aborted => ("idle".to_string(), Color::DarkGray),
    LoadState::Success => match last_refreshed.and_then(format_timestamp) {
      Some(when) => (format!("updated {}", when), Color::Green),
      None => ("ready".to_string(), Color::Green),
    },
  }
}

/// Local "YYYY-MM-DD HH:MM" for an epoch-ms timestamp
fn format_timestamp(ms: i64) -> Option<String> {
  Local
    .timestamp_millis_opt(ms)
    .single()
    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_status_label_states() {
    assert_eq!(status_label(&LoadState::Loading, None).0, "loading...");
    assert_eq!(status_label(&LoadState::Success, None).0, "ready");
    assert_eq!(status_label(&LoadState::Aborted, Some(1)).0, "idle");
  }

  #[test]
  fn test_status_label_with_refresh_time() {
    let (label, _) = status_label(&LoadState::Success, Some(1_700_000_000_000));
    assert!(label.starts_with("updated 2023-11-1"));
  }
}
