use crate::net::FetchError;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph, Wrap};

/// Truncate to `max_len` characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Display color for an item rarity
pub fn rarity_color(rarity: Option<&str>) -> Color {
  match rarity {
    Some("Legendary") => Color::LightYellow,
    Some("Epic") => Color::Magenta,
    Some("Rare") => Color::LightBlue,
    Some("Common") => Color::White,
    _ => Color::Gray,
  }
}

/// What a list surface shows. Exactly one applies at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section<'a> {
  Loading,
  Error(&'a FetchError),
  Empty,
  Data,
}

/// Error first, then loading, then empty. Data only when none of those apply.
pub fn section_state<'a>(loading: bool, error: Option<&'a FetchError>, len: usize) -> Section<'a> {
  if let Some(err) = error {
    Section::Error(err)
  } else if loading {
    Section::Loading
  } else if len == 0 {
    Section::Empty
  } else {
    Section::Data
  }
}

/// Render a non-data section state inside `block`.
pub fn render_section_message(
  frame: &mut Frame,
  area: Rect,
  block: Block,
  section: Section,
  empty_text: &str,
) {
  let (text, color) = match section {
    Section::Loading => ("Loading...".to_string(), Color::Yellow),
    Section::Error(err) => (format!("{}\n\nPress 'r' to retry.", err), Color::Red),
    Section::Empty | Section::Data => (empty_text.to_string(), Color::DarkGray),
  };
  let paragraph = Paragraph::new(text)
    .block(block)
    .style(Style::default().fg(color))
    .wrap(Wrap { trim: true });
  frame.render_widget(paragraph, area);
}
