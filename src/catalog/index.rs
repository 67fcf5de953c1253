//! Derived indices and search over an item collection.

use std::collections::BTreeMap;

use super::types::{Groups, Item};

/// Compute the sorted category list and the category grouping.
///
/// Pure and deterministic: categories are ascending and case-sensitive, items
/// keep their input order inside each group. Items without a category are not
/// part of either index.
pub fn derive_indices(items: &[Item]) -> (Vec<String>, Groups) {
  let mut groups: Groups = BTreeMap::new();
  for item in items {
    if let Some(category) = item.category.as_deref().filter(|c| !c.is_empty()) {
      groups
        .entry(category.to_string())
        .or_default()
        .push(item.clone());
    }
  }
  let categories = groups.keys().cloned().collect();
  (categories, groups)
}

/// Whether `term` is long enough to run a search.
pub fn is_searchable(term: &str, min_len: usize) -> bool {
  term.trim().chars().count() >= min_len
}

/// Case-insensitive substring match on item names, in collection order.
///
/// Returns nothing for terms shorter than `min_len`.
pub fn search(items: &[Item], term: &str, min_len: usize) -> Vec<Item> {
  if !is_searchable(term, min_len) {
    return Vec::new();
  }
  let needle = term.trim().to_lowercase();
  items
    .iter()
    .filter(|item| item.name.to_lowercase().contains(&needle))
    .cloned()
    .collect()
}
