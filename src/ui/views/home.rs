use crate::catalog::{is_searchable, search, Catalog};
use crate::ui::components::{Debouncer, ItemList, KeyResult, SearchEvent, SearchInput};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{render_section_message, section_state, Section};
use crate::ui::view::{ShortcutInfo, View, ViewAction, ViewContext};
use crate::ui::views::CategoryView;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Root view: category list, or search results while a search term is applied
pub struct HomeView {
  search: SearchInput,
  debounce: Debouncer<String>,
  /// Debounced term the results were computed for
  term: String,
  results: ItemList,
  /// Catalog snapshot the results were computed from
  snapshot: Catalog,
  categories: ListState,
}

impl HomeView {
  pub fn new(ctx: &ViewContext) -> Self {
    Self {
      search: SearchInput::new(),
      debounce: Debouncer::new(Duration::from_millis(ctx.ui.search_debounce_ms)),
      term: String::new(),
      results: ItemList::new(Arc::new(Vec::new()), ctx.ui.page_size),
      snapshot: ctx.query.catalog().clone(),
      categories: ListState::default(),
    }
  }

  fn is_searching(&self, ctx: &ViewContext) -> bool {
    is_searchable(&self.term, ctx.ui.min_search_len)
  }

  fn apply_term(&mut self, term: String, ctx: &ViewContext) {
    self.term = term;
    self.recompute(ctx);
  }

  fn recompute(&mut self, ctx: &ViewContext) {
    let found = search(&self.snapshot.items, &self.term, ctx.ui.min_search_len);
    self.results.set_items(Arc::new(found));
  }

  fn category_counts(&self) -> Vec<(String, usize)> {
    self
      .snapshot
      .categories
      .iter()
      .map(|c| (c.clone(), self.snapshot.items_in(c).len()))
      .collect()
  }

  fn search_hint(&self, ctx: &ViewContext) -> Option<String> {
    let typed = self.search.term();
    if !self.search.is_editing() || typed.trim().is_empty() {
      return None;
    }
    if is_searchable(&typed, ctx.ui.min_search_len) {
      None
    } else {
      Some(format!("type at least {} characters", ctx.ui.min_search_len))
    }
  }

  fn render_categories(&mut self, frame: &mut Frame, area: Rect, ctx: &ViewContext) {
    let counts = self.category_counts();
    ensure_valid_selection(&mut self.categories, counts.len());

    let block = Block::default()
      .title(format!(" Categories ({}) ", counts.len()))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let section = section_state(ctx.query.is_loading(), ctx.query.error(), counts.len());
    if section != Section::Data {
      render_section_message(frame, area, block, section, "No categories found.");
      return;
    }

    let rows: Vec<ListItem> = counts
      .iter()
      .map(|(category, count)| {
        ListItem::new(Line::from(vec![
          Span::styled(format!("{:<24}", category), Style::default().fg(Color::Cyan)),
          Span::styled(format!("{:>5}", count), Style::default().fg(Color::DarkGray)),
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
    frame.render_stateful_widget(list, area, &mut self.categories);
  }
}

impl View for HomeView {
  fn handle_key(&mut self, key: KeyEvent, ctx: &ViewContext) -> ViewAction {
    match self.search.handle_key(key) {
      KeyResult::Handled => return ViewAction::None,
      KeyResult::Event(SearchEvent::Changed(term)) => {
        self.debounce.push(term, Instant::now());
        return ViewAction::None;
      }
      KeyResult::Event(SearchEvent::Submitted) => {
        if let Some(term) = self.debounce.flush() {
          self.apply_term(term, ctx);
        }
        return ViewAction::None;
      }
      KeyResult::NotHandled => {}
    }

    if self.is_searching(ctx) {
      if let KeyResult::Handled = self.results.handle_key(key, ctx.query.is_loading()) {
        return ViewAction::None;
      }
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.categories.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.categories.select_previous(),
      KeyCode::Enter if !self.is_searching(ctx) => {
        let selected = self
          .categories
          .selected()
          .and_then(|i| self.snapshot.categories.get(i));
        if let Some(category) = selected {
          return ViewAction::Push(Box::new(CategoryView::new(category.clone(), ctx)));
        }
      }
      KeyCode::Char('r') => return ViewAction::Refresh,
      KeyCode::Char('q') => return ViewAction::Quit,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &ViewContext) {
    let [search_area, content_area] =
      Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(area);

    let hint = self.search_hint(ctx);
    self.search.render(frame, search_area, hint.as_deref());

    if self.is_searching(ctx) {
      let title = format!("Results for \"{}\"", self.term.trim());
      let section = section_state(
        ctx.query.is_loading(),
        ctx.query.error(),
        self.results.total(),
      );
      let empty = format!("No items match \"{}\".", self.term.trim());
      self.results.render(frame, content_area, &title, section, &empty);
    } else {
      self.render_categories(frame, content_area, ctx);
    }
  }

  fn breadcrumb_label(&self) -> String {
    "Categories".to_string()
  }

  fn tick(&mut self, ctx: &ViewContext) {
    self.results.set_page_size(ctx.ui.page_size);

    let catalog = ctx.query.catalog();
    let changed = !catalog.same_as(&self.snapshot);
    if changed {
      self.snapshot = catalog.clone();
    }
    ensure_valid_selection(&mut self.categories, self.snapshot.categories.len());

    match self.debounce.poll(Instant::now()) {
      Some(term) => self.apply_term(term, ctx),
      None if changed => self.recompute(ctx),
      None => {}
    }
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new("/", "search").with_priority(10),
      ShortcutInfo::new("enter", "open").with_priority(15),
      ShortcutInfo::new("r", "refresh").with_priority(20),
      ShortcutInfo::new("q", "quit").with_priority(30),
    ]
  }
}
