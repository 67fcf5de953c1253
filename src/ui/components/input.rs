use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Result of handling a key event in an input component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
  /// Buffer changed
  Changed,
  /// Key was handled but the buffer is unchanged (cursor movement)
  Moved,
  /// Enter pressed
  Submitted,
  /// Escape pressed
  Cancelled,
  /// Key not handled, pass to next handler
  NotHandled,
}

/// Single-line text input. The cursor counts characters, not bytes.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
  chars: Vec<char>,
  cursor: usize,
}

impl TextInput {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn value(&self) -> String {
    self.chars.iter().collect()
  }

  pub fn is_empty(&self) -> bool {
    self.chars.is_empty()
  }

  pub fn clear(&mut self) {
    self.chars.clear();
    self.cursor = 0;
  }

  /// Cursor position in characters
  pub fn cursor(&self) -> usize {
    self.cursor
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> InputResult {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
      KeyCode::Esc => InputResult::Cancelled,
      KeyCode::Enter => InputResult::Submitted,
      KeyCode::Backspace if self.cursor > 0 => {
        self.cursor -= 1;
        self.chars.remove(self.cursor);
        InputResult::Changed
      }
      KeyCode::Delete if self.cursor < self.chars.len() => {
        self.chars.remove(self.cursor);
        InputResult::Changed
      }
      KeyCode::Backspace | KeyCode::Delete => InputResult::Moved,
      KeyCode::Left => {
        self.cursor = self.cursor.saturating_sub(1);
        InputResult::Moved
      }
      KeyCode::Right => {
        self.cursor = (self.cursor + 1).min(self.chars.len());
        InputResult::Moved
      }
      KeyCode::Home => {
        self.cursor = 0;
        InputResult::Moved
      }
      KeyCode::End => {
        self.cursor = self.chars.len();
        InputResult::Moved
      }
      KeyCode::Char('a') if ctrl => {
        self.cursor = 0;
        InputResult::Moved
      }
      KeyCode::Char('e') if ctrl => {
        self.cursor = self.chars.len();
        InputResult::Moved
      }
      KeyCode::Char('u') if ctrl => {
        self.chars.drain(..self.cursor);
        self.cursor = 0;
        InputResult::Changed
      }
      KeyCode::Char('w') if ctrl => {
        let end = self.cursor;
        let mut start = end;
        while start > 0 && self.chars[start - 1] == ' ' {
          start -= 1;
        }
        while start > 0 && self.chars[start - 1] != ' ' {
          start -= 1;
        }
        self.chars.drain(start..end);
        self.cursor = start;
        InputResult::Changed
      }
      KeyCode::Char(_) if ctrl => InputResult::NotHandled,
      KeyCode::Char(c) => {
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
        InputResult::Changed
      }
      _ => InputResult::NotHandled,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn ctrl_key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::CONTROL)
  }

  fn typed(text: &str) -> TextInput {
    let mut input = TextInput::new();
    for c in text.chars() {
      input.handle_key(key(KeyCode::Char(c)));
    }
    input
  }

  #[test]
  fn test_typing() {
    let input = typed("yeti");
    assert_eq!(input.value(), "yeti");
    assert_eq!(input.cursor(), 4);
  }

  #[test]
  fn test_submit_and_cancel() {
    let mut input = typed("fire");
    assert_eq!(input.handle_key(key(KeyCode::Enter)), InputResult::Submitted);
    assert_eq!(input.handle_key(key(KeyCode::Esc)), InputResult::Cancelled);
    assert_eq!(input.value(), "fire");
  }

  #[test]
  fn test_backspace_at_start_is_noop() {
    let mut input = TextInput::new();
    assert_eq!(input.handle_key(key(KeyCode::Backspace)), InputResult::Moved);
    assert!(input.is_empty());
  }

  #[test]
  fn test_multibyte_editing() {
    let mut input = typed("Lúcio");
    input.handle_key(key(KeyCode::Left));
    input.handle_key(key(KeyCode::Left));
    input.handle_key(key(KeyCode::Left));
    input.handle_key(key(KeyCode::Backspace));
    assert_eq!(input.value(), "Lcio");
    input.handle_key(key(KeyCode::Char('ü')));
    assert_eq!(input.value(), "Lücio");
  }

  #[test]
  fn test_ctrl_u_clears_before_cursor() {
    let mut input = typed("war axe");
    for _ in 0..3 {
      input.handle_key(key(KeyCode::Left));
    }
    assert_eq!(input.handle_key(ctrl_key(KeyCode::Char('u'))), InputResult::Changed);
    assert_eq!(input.value(), "axe");
    assert_eq!(input.cursor(), 0);
  }

  #[test]
  fn test_ctrl_w_deletes_previous_word() {
    let mut input = typed("fiery war  ");
    input.handle_key(ctrl_key(KeyCode::Char('w')));
    assert_eq!(input.value(), "fiery ");
  }

  #[test]
  fn test_other_ctrl_chars_not_handled() {
    let mut input = TextInput::new();
    assert_eq!(input.handle_key(ctrl_key(KeyCode::Char('c'))), InputResult::NotHandled);
    assert!(input.is_empty());
  }
}
