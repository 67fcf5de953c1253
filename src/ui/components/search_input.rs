use super::input::{InputResult, TextInput};
use super::KeyResult;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

/// Events emitted by search input that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
  /// Term changed (each edit; empty string on cancel)
  Changed(String),
  /// Editing finished, the term stays applied
  Submitted,
}

/// Search box with an editing mode entered with `/`
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
  input: TextInput,
  editing: bool,
}

impl SearchInput {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_editing(&self) -> bool {
    self.editing
  }

  pub fn term(&self) -> String {
    self.input.value()
  }

  /// Call this regardless of editing state - it handles activation too.
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<SearchEvent> {
    if !self.editing {
      if key.code == KeyCode::Char('/') {
        self.editing = true;
        return KeyResult::Handled;
      }
      // Esc outside editing drops an applied term
      if key.code == KeyCode::Esc && !self.input.is_empty() {
        self.input.clear();
        return KeyResult::Event(SearchEvent::Changed(String::new()));
      }
      return KeyResult::NotHandled;
    }

    match self.input.handle_key(key) {
      InputResult::Submitted => {
        self.editing = false;
        KeyResult::Event(SearchEvent::Submitted)
      }
      InputResult::Cancelled => {
        self.editing = false;
        self.input.clear();
        KeyResult::Event(SearchEvent::Changed(String::new()))
      }
      InputResult::Changed => KeyResult::Event(SearchEvent::Changed(self.input.value())),
      InputResult::Moved => KeyResult::Handled,
      InputResult::NotHandled => KeyResult::NotHandled,
    }
  }

  /// Render the one-line search box. `hint` is shown dimmed after the term.
  pub fn render(&self, frame: &mut Frame, area: Rect, hint: Option<&str>) {
    let border = if self.editing {
      Color::Yellow
    } else {
      Color::DarkGray
    };
    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(border))
      .title(" Search ");

    let mut spans = vec![Span::styled("/", Style::default().fg(Color::Yellow))];
    if self.editing {
      let value = self.input.value();
      let split = value
        .char_indices()
        .nth(self.input.cursor())
        .map(|(i, _)| i)
        .unwrap_or(value.len());
      let (before, after) = value.split_at(split);
      spans.push(Span::raw(before.to_string()));
      spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
      spans.push(Span::raw(after.to_string()));
    } else {
      spans.push(Span::raw(self.input.value()));
    }
    if let Some(hint) = hint {
      spans.push(Span::styled(
        format!("  {}", hint),
        Style::default().fg(Color::DarkGray),
      ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
  }
}
