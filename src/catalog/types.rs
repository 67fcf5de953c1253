use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::index::derive_indices;

/// A catalog entry (one card).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub category: Option<String>,
  /// Originating set
  #[serde(default)]
  pub collection_tag: String,
  #[serde(default)]
  pub image_url: Option<String>,
  #[serde(default)]
  pub rarity: Option<String>,
  #[serde(default)]
  pub cost: Option<i64>,
  #[serde(default)]
  pub attack: Option<i64>,
  #[serde(default)]
  pub health: Option<i64>,
  #[serde(default)]
  pub text: Option<String>,
  #[serde(default)]
  pub flavor: Option<String>,
  #[serde(default)]
  pub artist: Option<String>,
  #[serde(default)]
  pub player_class: Option<String>,
}

#[cfg(test)]
impl Item {
  /// Minimal item with an image, for tests.
  pub fn sample(id: &str, name: &str, category: Option<&str>) -> Self {
    Self {
      id: id.to_string(),
      name: name.to_string(),
      category: category.map(String::from),
      collection_tag: "Basic".to_string(),
      image_url: Some(format!("https://img/{}.png", id)),
      rarity: None,
      cost: None,
      attack: None,
      health: None,
      text: None,
      flavor: None,
      artist: None,
      player_class: None,
    }
  }
}

/// Category -> items in fetch order.
pub type Groups = BTreeMap<String, Vec<Item>>;

/// Immutable snapshot of the catalog and its derived indices.
///
/// Produced once per successful fetch or cache hit. The `Arc`s give every
/// snapshot a stable identity that consumers compare with `Arc::ptr_eq`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
  pub items: Arc<Vec<Item>>,
  pub categories: Arc<Vec<String>>,
  pub groups: Arc<Groups>,
}

impl Catalog {
  /// Build a snapshot, deriving categories and groups from `items`.
  pub fn from_items(items: Vec<Item>) -> Self {
    let (categories, groups) = derive_indices(&items);
    Self::from_parts(items, categories, groups)
  }

  pub fn from_parts(items: Vec<Item>, categories: Vec<String>, groups: Groups) -> Self {
    Self {
      items: Arc::new(items),
      categories: Arc::new(categories),
      groups: Arc::new(groups),
    }
  }

  /// Items of one category, empty for an unknown category.
  pub fn items_in(&self, category: &str) -> &[Item] {
    self
      .groups
      .get(category)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Whether `other` is the very same snapshot (not just equal contents).
  pub fn same_as(&self, other: &Catalog) -> bool {
    Arc::ptr_eq(&self.items, &other.items)
  }
}
