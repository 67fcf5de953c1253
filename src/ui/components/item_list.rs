use super::KeyResult;
use crate::catalog::Item;
use crate::pagination::Paginator;
use crate::ui::renderfns::{rarity_color, render_section_message, truncate, Section};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use std::sync::Arc;

/// Paginated item list with a detail pane for the selection.
///
/// Moving the selection onto the last visible row reveals the next page.
pub struct ItemList {
  pager: Paginator<Item>,
  list_state: ListState,
}

impl ItemList {
  pub fn new(items: Arc<Vec<Item>>, page_size: usize) -> Self {
    let mut list = Self {
      pager: Paginator::new(items, page_size),
      list_state: ListState::default(),
    };
    list.reset_selection();
    list
  }

  /// Swap in a new collection; a different one starts over at the top.
  pub fn set_items(&mut self, items: Arc<Vec<Item>>) {
    if self.pager.set_items(items) {
      self.reset_selection();
    }
  }

  pub fn set_page_size(&mut self, page_size: usize) {
    if self.pager.set_page_size(page_size) {
      self.reset_selection();
    }
  }

  pub fn visible_count(&self) -> usize {
    self.pager.visible_count()
  }

  pub fn total(&self) -> usize {
    self.pager.total()
  }

  pub fn selected(&self) -> Option<&Item> {
    self
      .list_state
      .selected()
      .and_then(|i| self.pager.visible().get(i))
  }

  fn reset_selection(&mut self) {
    let first = (self.pager.visible_count() > 0).then_some(0);
    self.list_state.select(first);
  }

  /// Move to `index` (clamped). Landing on the last visible row asks the
  /// paginator for more, which it refuses while `loading`.
  fn select(&mut self, index: usize, loading: bool) {
    let count = self.pager.visible_count();
    if count == 0 {
      self.list_state.select(None);
      return;
    }
    let index = index.min(count - 1);
    self.list_state.select(Some(index));
    if index + 1 == count {
      self.pager.load_more(loading);
    }
  }

  pub fn handle_key(&mut self, key: KeyEvent, loading: bool) -> KeyResult<()> {
    let current = self.list_state.selected().unwrap_or(0);
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.select(current + 1, loading),
      KeyCode::Char('k') | KeyCode::Up => self.select(current.saturating_sub(1), loading),
      KeyCode::PageDown => self.select(current + self.pager.page_size(), loading),
      KeyCode::PageUp => self.select(current.saturating_sub(self.pager.page_size()), loading),
      KeyCode::Char('g') | KeyCode::Home => self.select(0, loading),
      KeyCode::Char('G') | KeyCode::End => self.select(usize::MAX, loading),
      _ => return KeyResult::NotHandled,
    }
    KeyResult::Handled
  }

  /// Render list and detail side by side. Non-data sections take the whole area.
  pub fn render(
    &mut self,
    frame: &mut Frame,
    area: Rect,
    title: &str,
    section: Section,
    empty_text: &str,
  ) {
    let mut heading = format!(
      " {} ({}/{}) ",
      title,
      self.pager.visible_count(),
      self.pager.total()
    );
    if self.pager.has_more() {
      heading.push_str("more below ");
    }
    let block = Block::default()
      .title(heading)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if section != Section::Data {
      render_section_message(frame, area, block, section, empty_text);
      return;
    }

    let [list_area, detail_area] =
      Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);

    let rows: Vec<ListItem> = self
      .pager
      .visible()
      .iter()
      .map(|item| {
        let cost = item.cost.map(|c| format!("{:>2}", c)).unwrap_or_else(|| " -".to_string());
        ListItem::new(Line::from(vec![
          Span::styled(format!("{} ", cost), Style::default().fg(Color::Cyan)),
          Span::styled(
            truncate(&item.name, 40),
            Style::default().fg(rarity_color(item.rarity.as_deref())),
          ),
        ]))
      })
      .collect();

    let list = List::new(rows)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");
    frame.render_stateful_widget(list, list_area, &mut self.list_state);

    render_detail(frame, detail_area, self.selected());
  }
}

fn render_detail(frame: &mut Frame, area: Rect, item: Option<&Item>) {
  let block = Block::default()
    .title(" Detail ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let Some(item) = item else {
    frame.render_widget(Paragraph::new("").block(block), area);
    return;
  };

  let label = Style::default().fg(Color::DarkGray);
  let field = |name: &'static str, value: String| {
    Line::from(vec![
      Span::styled(format!("{:<8}", name), label),
      Span::raw(value),
    ])
  };

  let mut lines = vec![
    Line::from(Span::styled(
      item.name.clone(),
      Style::default()
        .fg(rarity_color(item.rarity.as_deref()))
        .bold(),
    )),
    Line::raw(""),
    field("Set", item.collection_tag.clone()),
  ];
  if let Some(category) = &item.category {
    lines.push(field("Type", category.clone()));
  }
  if let Some(rarity) = &item.rarity {
    lines.push(field("Rarity", rarity.clone()));
  }
  if let Some(class) = &item.player_class {
    lines.push(field("Class", class.clone()));
  }
  let stats = [("Cost", item.cost), ("Attack", item.attack), ("Health", item.health)]
    .iter()
    .filter_map(|(name, value)| value.map(|v| format!("{} {}", name, v)))
    .collect::<Vec<_>>();
  if !stats.is_empty() {
    lines.push(field("Stats", stats.join("  ")));
  }
  if let Some(text) = &item.text {
    lines.push(Line::raw(""));
    lines.push(Line::raw(plain_text(text)));
  }
  if let Some(flavor) = &item.flavor {
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
      plain_text(flavor),
      Style::default().fg(Color::Gray).italic(),
    )));
  }
  if let Some(artist) = &item.artist {
    lines.push(Line::raw(""));
    lines.push(field("Artist", artist.clone()));
  }
  if let Some(image) = &item.image_url {
    lines.push(field("Image", image.clone()));
  }

  let paragraph = Paragraph::new(lines)
    .block(block)
    .wrap(Wrap { trim: false });
  frame.render_widget(paragraph, area);
}

/// Strip the card-text markup: HTML tags, `[x]`, line breaks and the
/// `$`/`#` markers in front of numbers.
fn plain_text(text: &str) -> String {
  let text = text.replace("[x]", "").replace("\\n", " ").replace('\n', " ");
  let mut out = String::with_capacity(text.len());
  let mut in_tag = false;
  let mut chars = text.chars().peekable();
  while let Some(c) = chars.next() {
    match c {
      '<' => in_tag = true,
      '>' if in_tag => in_tag = false,
      _ if in_tag => {}
      '$' | '#' if chars.peek().is_some_and(|n| n.is_ascii_digit()) => {}
      _ => out.push(c),
    }
  }
  out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn items(n: usize) -> Arc<Vec<Item>> {
    Arc::new(
      (0..n)
        .map(|i| Item::sample(&i.to_string(), &format!("Card {}", i), Some("Minion")))
        .collect(),
    )
  }

  #[test]
  fn test_reaching_last_row_loads_more() {
    let mut list = ItemList::new(items(12), 5);
    assert_eq!(list.visible_count(), 5);

    for _ in 0..3 {
      list.handle_key(key(KeyCode::Down), false);
    }
    assert_eq!(list.visible_count(), 5);

    // Fifth row is the last visible one
    list.handle_key(key(KeyCode::Down), false);
    assert_eq!(list.selected().map(|i| i.id.as_str()), Some("4"));
    assert_eq!(list.visible_count(), 10);

    list.handle_key(key(KeyCode::Char('G')), false);
    assert_eq!(list.visible_count(), 12);
    assert_eq!(list.selected().map(|i| i.id.as_str()), Some("9"));

    list.handle_key(key(KeyCode::Char('G')), false);
    assert_eq!(list.selected().map(|i| i.id.as_str()), Some("11"));
    assert_eq!(list.visible_count(), 12);
  }

  #[test]
  fn test_no_load_more_while_loading() {
    let mut list = ItemList::new(items(12), 5);
    list.handle_key(key(KeyCode::End), true);
    assert_eq!(list.visible_count(), 5);
    assert_eq!(list.selected().map(|i| i.id.as_str()), Some("4"));
  }

  #[test]
  fn test_new_collection_resets_selection() {
    let mut list = ItemList::new(items(12), 5);
    list.handle_key(key(KeyCode::End), false);
    assert_eq!(list.visible_count(), 10);

    list.set_items(items(3));
    assert_eq!(list.visible_count(), 3);
    assert_eq!(list.selected().map(|i| i.id.as_str()), Some("0"));
  }

  #[test]
  fn test_page_size_change_resets() {
    let mut list = ItemList::new(items(12), 5);
    list.handle_key(key(KeyCode::End), false);
    list.set_page_size(4);
    assert_eq!(list.visible_count(), 4);
  }

  #[test]
  fn test_empty_list_has_no_selection() {
    let mut list = ItemList::new(items(0), 5);
    list.handle_key(key(KeyCode::Down), false);
    assert!(list.selected().is_none());
    assert_eq!(list.total(), 0);
  }

  #[test]
  fn test_unrelated_key_not_handled() {
    let mut list = ItemList::new(items(2), 5);
    assert_eq!(list.handle_key(key(KeyCode::Char('x')), false), KeyResult::NotHandled);
  }

  #[test]
  fn test_plain_text_strips_markup() {
    assert_eq!(
      plain_text("[x]<b>Battlecry:</b> Deal $3 damage.\\nGain #2 Armor."),
      "Battlecry: Deal 3 damage. Gain 2 Armor."
    );
    assert_eq!(plain_text("Costs $ nothing"), "Costs $ nothing");
  }
}
