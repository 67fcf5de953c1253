use crate::catalog::{Catalog, Item};
use crate::ui::components::{ItemList, KeyResult};
use crate::ui::renderfns::section_state;
use crate::ui::view::{ShortcutInfo, View, ViewAction, ViewContext};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use std::sync::Arc;

/// Items of one category, paginated, with a detail pane
pub struct CategoryView {
  category: String,
  snapshot: Catalog,
  list: ItemList,
}

impl CategoryView {
  pub fn new(category: String, ctx: &ViewContext) -> Self {
    let snapshot = ctx.query.catalog().clone();
    let list = ItemList::new(group_of(&snapshot, &category), ctx.ui.page_size);
    Self {
      category,
      snapshot,
      list,
    }
  }
}

fn group_of(catalog: &Catalog, category: &str) -> Arc<Vec<Item>> {
  Arc::new(catalog.items_in(category).to_vec())
}

impl View for CategoryView {
  fn handle_key(&mut self, key: KeyEvent, ctx: &ViewContext) -> ViewAction {
    if let KeyResult::Handled = self.list.handle_key(key, ctx.query.is_loading()) {
      return ViewAction::None;
    }
    match key.code {
      KeyCode::Char('r') => ViewAction::Refresh,
      KeyCode::Char('q') | KeyCode::Esc => ViewAction::Pop,
      _ => ViewAction::None,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &ViewContext) {
    let section = section_state(ctx.query.is_loading(), ctx.query.error(), self.list.total());
    let empty = format!("No {} items found", self.category);
    self.list.render(frame, area, &self.category, section, &empty);
  }

  fn breadcrumb_label(&self) -> String {
    self.category.clone()
  }

  fn tick(&mut self, ctx: &ViewContext) {
    self.list.set_page_size(ctx.ui.page_size);

    let catalog = ctx.query.catalog();
    if !catalog.same_as(&self.snapshot) {
      self.snapshot = catalog.clone();
      self.list.set_items(group_of(&self.snapshot, &self.category));
    }
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new("j/k", "move").with_priority(10),
      ShortcutInfo::new("r", "refresh").with_priority(20),
      ShortcutInfo::new("q", "back").with_priority(30),
    ]
  }
}
