//! Serde-deserializable types matching the card listing API.
//!
//! These types are separate from domain types to allow clean deserialization
//! while keeping domain types focused on application needs.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::types::Item;

/// A single card record as returned by `GET /cards`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCard {
  pub card_id: String,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub card_set: String,
  #[serde(rename = "type")]
  pub card_type: Option<String>,
  pub rarity: Option<String>,
  pub cost: Option<i64>,
  pub attack: Option<i64>,
  pub health: Option<i64>,
  pub text: Option<String>,
  pub flavor: Option<String>,
  pub artist: Option<String>,
  pub player_class: Option<String>,
  pub img: Option<String>,
}

impl ApiCard {
  /// Convert to a domain item. Cards without an image are not kept.
  pub fn into_item(self) -> Option<Item> {
    let image_url = self.img.filter(|img| !img.is_empty())?;
    Some(Item {
      id: self.card_id,
      name: self.name,
      category: self.card_type.filter(|t| !t.is_empty()),
      collection_tag: self.card_set,
      image_url: Some(image_url),
      rarity: self.rarity,
      cost: self.cost,
      attack: self.attack,
      health: self.health,
      text: self.text,
      flavor: self.flavor,
      artist: self.artist,
      player_class: self.player_class,
    })
  }
}

/// Flatten the `{ "<set>": [card, ...], ... }` response into one collection.
///
/// Sets are visited in response order and cards keep their order within a
/// set. Values that are not arrays and records that do not parse are skipped.
/// Returns `None` when the body is not an object at all.
pub fn flatten_response(body: Value) -> Option<Vec<Item>> {
  let Value::Object(sets) = body else {
    return None;
  };

  let mut items = Vec::new();
  for (set, cards) in sets {
    let Value::Array(cards) = cards else {
      debug!(set = %set, "skipping non-array set");
      continue;
    };
    for card in cards {
      match serde_json::from_value::<ApiCard>(card) {
        Ok(card) => items.extend(card.into_item()),
        Err(e) => debug!(set = %set, error = %e, "skipping malformed card"),
      }
    }
  }
  Some(items)
}
