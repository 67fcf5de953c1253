//! Incremental reveal of a collection in fixed-size pages.

use std::sync::Arc;

/// Reveals `page_size` more items per `load_more`.
///
/// The paginator holds the collection by `Arc` and resets to the first page
/// whenever it is handed a different collection (by identity, not contents)
/// or a different page size.
#[derive(Debug, Clone)]
pub struct Paginator<T> {
  items: Arc<Vec<T>>,
  page_size: usize,
  current_page: usize,
}

impl<T> Paginator<T> {
  pub fn new(items: Arc<Vec<T>>, page_size: usize) -> Self {
    Self {
      items,
      page_size: page_size.max(1),
      current_page: 1,
    }
  }

  /// Swap the collection. A different `Arc` resets to the first page.
  ///
  /// Returns `true` if the paginator was reset.
  pub fn set_items(&mut self, items: Arc<Vec<T>>) -> bool {
    if Arc::ptr_eq(&self.items, &items) {
      return false;
    }
    self.items = items;
    self.current_page = 1;
    true
  }

  pub fn set_page_size(&mut self, page_size: usize) -> bool {
    let page_size = page_size.max(1);
    if page_size == self.page_size {
      return false;
    }
    self.page_size = page_size;
    self.current_page = 1;
    true
  }

  pub fn page_size(&self) -> usize {
    self.page_size
  }

  pub fn total(&self) -> usize {
    self.items.len()
  }

  pub fn visible_count(&self) -> usize {
    self
      .current_page
      .saturating_mul(self.page_size)
      .min(self.items.len())
  }

  pub fn has_more(&self) -> bool {
    self.visible_count() < self.items.len()
  }

  /// Reveal the next page. Ignored while `loading` or when nothing is left.
  ///
  /// Returns `true` if more items became visible.
  pub fn load_more(&mut self, loading: bool) -> bool {
    if loading || !self.has_more() {
      return false;
    }
    self.current_page += 1;
    true
  }

  pub fn visible(&self) -> &[T] {
    &self.items[..self.visible_count()]
  }
}
