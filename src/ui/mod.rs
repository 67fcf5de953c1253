pub mod components;
pub mod renderfns;
pub mod view;
pub mod views;

use ratatui::widgets::ListState;

/// Keep a list selection inside `len` rows (none when empty)
pub fn ensure_valid_selection(state: &mut ListState, len: usize) {
  match state.selected() {
    _ if len == 0 => state.select(None),
    Some(i) if i >= len => state.select(Some(len - 1)),
    None => state.select(Some(0)),
    Some(_) => {}
  }
}

#[cfg(test)]
pub mod testing {
  use crate::cache::{CacheKey, CacheStore, MemoryStorage};
  use crate::catalog::{Catalog, CatalogClient, Item};
  use crate::config::{ApiConfig, CacheConfig, UiConfig};
  use crate::net::testing::ScriptedTransport;
  use crate::net::RetryPolicy;
  use crate::query::CatalogQuery;
  use ratatui::backend::TestBackend;
  use ratatui::buffer::Buffer;
  use std::sync::Arc;
  use std::time::Duration;

  pub fn sample_items() -> Vec<Item> {
    vec![
      Item::sample("1", "Fireball", Some("Spell")),
      Item::sample("2", "Chillwind Yeti", Some("Minion")),
      Item::sample("3", "Fiery War Axe", Some("Weapon")),
      Item::sample("4", "Frostbolt", Some("Spell")),
      Item::sample("5", "Boulderfist Ogre", Some("Minion")),
      Item::sample("6", "The Coin", None),
    ]
  }

  /// A query already holding `items`, served from a seeded in-memory cache.
  pub fn loaded_query(items: Vec<Item>) -> CatalogQuery {
    let storage = Arc::new(MemoryStorage::new());
    let cache = CacheStore::new(storage, &CacheConfig::default());
    let catalog = Catalog::from_items(items);
    cache.set(CacheKey::Items, catalog.items.as_ref());
    cache.set(CacheKey::Categories, catalog.categories.as_ref());
    cache.set(CacheKey::Groups, catalog.groups.as_ref());

    let client = CatalogClient::new(
      Arc::new(ScriptedTransport::new(vec![])),
      &ApiConfig::default(),
      RetryPolicy::new(0, Duration::from_millis(1)),
    );
    let mut query = CatalogQuery::new(client, cache);
    query.start();
    query
  }

  /// UI settings without debounce delay
  pub fn ui_config(page_size: usize) -> UiConfig {
    UiConfig {
      page_size,
      search_debounce_ms: 0,
      ..UiConfig::default()
    }
  }

  pub fn buffer_text(buffer: &Buffer) -> String {
    let mut text = String::new();
    for y in 0..buffer.area.height {
      for x in 0..buffer.area.width {
        text.push_str(buffer[(x, y)].symbol());
      }
      text.push('\n');
    }
    text
  }

  pub fn backend() -> TestBackend {
    TestBackend::new(100, 24)
  }
}
