//! TTL-aware envelope store on top of a key/value backend.

use chrono::Utc;
use color_eyre::Result;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::storage::KvStorage;
use crate::config::CacheConfig;

/// Logical artifacts kept in the cache, one key each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum CacheKey {
  /// Full filtered item collection
  Items,
  /// Sorted distinct categories
  Categories,
  /// Category -> items grouping
  Groups,
  /// Epoch-ms of the last successful refresh, stored bare (no envelope)
  RefreshedAt,
}

impl CacheKey {
  #[cfg(test)]
  pub const ALL: [CacheKey; 4] = [
    CacheKey::Items,
    CacheKey::Categories,
    CacheKey::Groups,
    CacheKey::RefreshedAt,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Items => "catalog.items",
      Self::Categories => "catalog.categories",
      Self::Groups => "catalog.groups",
      Self::RefreshedAt => "catalog.refreshed_at",
    }
  }
}

/// Persisted wrapper around every cached artifact.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
  /// Epoch milliseconds at write time
  timestamp: i64,
  data: T,
}

/// Read-through cache with a single TTL and a global on/off switch.
///
/// When disabled every read misses and every write is dropped; entries
/// written earlier are left alone until explicitly cleared.
#[derive(Clone)]
pub struct CacheStore {
  storage: Arc<dyn KvStorage>,
  enabled: bool,
  ttl: Duration,
}

impl CacheStore {
  pub fn new(storage: Arc<dyn KvStorage>, config: &CacheConfig) -> Self {
    Self {
      storage,
      enabled: config.enabled,
      ttl: config.ttl(),
    }
  }

  pub fn is_enabled(&self) -> bool {
    self.enabled
  }

  pub fn ttl(&self) -> Duration {
    self.ttl
  }

  /// Whether an entry written at `timestamp` (epoch ms) is still fresh.
  pub fn is_valid(&self, timestamp: i64) -> bool {
    self.is_valid_at(timestamp, now_ms())
  }

  fn is_valid_at(&self, timestamp: i64, now: i64) -> bool {
    if !self.enabled || timestamp <= 0 {
      return false;
    }
    let ttl_ms = i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX);
    now.saturating_sub(timestamp) < ttl_ms
  }

  /// Read a fresh entry. Absent, stale and malformed entries all read as `None`.
  pub fn get<T: DeserializeOwned>(&self, key: CacheKey) -> Option<T> {
    if !self.enabled {
      return None;
    }

    let raw = match self.storage.get(key.as_str()) {
      Ok(Some(raw)) => raw,
      Ok(None) => return None,
      Err(e) => {
        warn!(key = key.as_str(), error = %e, "cache read failed");
        return None;
      }
    };

    let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
      Ok(entry) => entry,
      Err(e) => {
        debug!(key = key.as_str(), error = %e, "malformed cache entry");
        return None;
      }
    };

    if !self.is_valid(entry.timestamp) {
      debug!(key = key.as_str(), timestamp = entry.timestamp, "cache entry expired");
      return None;
    }

    Some(entry.data)
  }

  /// Write `data` stamped with the current time. No-op when disabled.
  pub fn set<T: Serialize>(&self, key: CacheKey, data: &T) {
    if !self.enabled {
      return;
    }

    let entry = CacheEntry {
      timestamp: now_ms(),
      data,
    };
    let raw = match serde_json::to_string(&entry) {
      Ok(raw) => raw,
      Err(e) => {
        warn!(key = key.as_str(), error = %e, "failed to serialize cache entry");
        return;
      }
    };

    if let Err(e) = self.storage.set(key.as_str(), &raw) {
      warn!(key = key.as_str(), error = %e, "cache write failed");
    }
  }

  /// Record the time of the last successful refresh.
  pub fn touch_refreshed(&self) {
    if !self.enabled {
      return;
    }
    let key = CacheKey::RefreshedAt;
    if let Err(e) = self.storage.set(key.as_str(), &now_ms().to_string()) {
      warn!(key = key.as_str(), error = %e, "cache write failed");
    }
  }

  /// Epoch-ms of the last successful refresh, if known.
  pub fn last_refreshed(&self) -> Option<i64> {
    if !self.enabled {
      return None;
    }
    match self.storage.get(CacheKey::RefreshedAt.as_str()) {
      Ok(raw) => raw.and_then(|s| s.trim().parse().ok()),
      Err(e) => {
        warn!(error = %e, "cache read failed");
        None
      }
    }
  }

  /// Remove one artifact. Works regardless of the enabled flag.
  pub fn delete(&self, key: CacheKey) -> Result<()> {
    self.storage.delete(key.as_str())
  }

  /// Remove every cached artifact. Works regardless of the enabled flag.
  pub fn clear_all(&self) -> Result<()> {
    self.storage.clear()
  }
}

fn now_ms() -> i64 {
  Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::MemoryStorage;

  const HOUR_MS: i64 = 60 * 60 * 1000;

  fn config(enabled: bool, hours: u64) -> CacheConfig {
    CacheConfig {
      enabled,
      duration_hours: hours,
      path: None,
    }
  }

  fn store_with(enabled: bool) -> (CacheStore, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let store = CacheStore::new(storage.clone(), &config(enabled, 48));
    (store, storage)
  }

  fn write_raw(storage: &MemoryStorage, key: CacheKey, timestamp: i64, data: &str) {
    storage
      .set(
        key.as_str(),
        &format!(r#"{{"timestamp":{},"data":{}}}"#, timestamp, data),
      )
      .unwrap();
  }

  #[test]
  fn test_keys_are_distinct() {
    let mut keys: Vec<&str> = CacheKey::ALL.iter().map(|k| k.as_str()).collect();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), CacheKey::ALL.len());
  }

  #[test]
  fn test_is_valid_respects_ttl() {
    let (store, _) = store_with(true);
    let now = 1_000 * HOUR_MS;
    for hours in [0, 1, 24, 47] {
      assert!(store.is_valid_at(now - hours * HOUR_MS, now), "{} hours", hours);
    }
    assert!(store.is_valid_at(now - 48 * HOUR_MS + 1, now));
    assert!(!store.is_valid_at(now - 48 * HOUR_MS, now));
    assert!(!store.is_valid_at(now - 100 * HOUR_MS, now));
  }

  #[test]
  fn test_is_valid_false_when_disabled() {
    let (store, _) = store_with(false);
    let now = 1_000 * HOUR_MS;
    assert!(!store.is_valid_at(now, now));
    assert!(!store.is_valid(now_ms() - 1));
  }

  #[test]
  fn test_zero_ttl_never_valid() {
    let store = CacheStore::new(Arc::new(MemoryStorage::new()), &config(true, 0));
    let now = 1_000 * HOUR_MS;
    assert!(!store.is_valid_at(now, now));
  }

  #[test]
  fn test_set_then_get() {
    let (store, _) = store_with(true);
    store.set(CacheKey::Categories, &vec!["Minion", "Spell"]);
    let got: Option<Vec<String>> = store.get(CacheKey::Categories);
    assert_eq!(got, Some(vec!["Minion".to_string(), "Spell".to_string()]));
  }

  #[test]
  fn test_get_missing_is_none() {
    let (store, _) = store_with(true);
    assert_eq!(store.get::<Vec<String>>(CacheKey::Items), None);
  }

  #[test]
  fn test_expired_entry_is_a_miss() {
    let (store, storage) = store_with(true);
    write_raw(&storage, CacheKey::Categories, now_ms() - 49 * HOUR_MS, r#"["Minion"]"#);
    assert_eq!(store.get::<Vec<String>>(CacheKey::Categories), None);

    write_raw(&storage, CacheKey::Categories, now_ms() - HOUR_MS, r#"["Minion"]"#);
    assert_eq!(
      store.get::<Vec<String>>(CacheKey::Categories),
      Some(vec!["Minion".to_string()])
    );
  }

  #[test]
  fn test_malformed_entries_are_misses() {
    let (store, storage) = store_with(true);
    let key = CacheKey::Categories.as_str();

    storage.set(key, "not json").unwrap();
    assert_eq!(store.get::<Vec<String>>(CacheKey::Categories), None);

    storage.set(key, r#"{"data":["x"]}"#).unwrap();
    assert_eq!(store.get::<Vec<String>>(CacheKey::Categories), None);

    storage.set(key, r#"{"timestamp":"yesterday","data":["x"]}"#).unwrap();
    assert_eq!(store.get::<Vec<String>>(CacheKey::Categories), None);

    // Wrong payload shape
    write_raw(&storage, CacheKey::Categories, now_ms(), r#"{"a":1}"#);
    assert_eq!(store.get::<Vec<String>>(CacheKey::Categories), None);
  }

  #[test]
  fn test_disabled_store_misses_and_never_writes() {
    let storage = Arc::new(MemoryStorage::new());
    write_raw(&storage, CacheKey::Categories, now_ms(), r#"["Minion"]"#);

    let store = CacheStore::new(storage.clone(), &config(false, 48));
    assert_eq!(store.get::<Vec<String>>(CacheKey::Categories), None);

    store.set(CacheKey::Items, &vec![1, 2, 3]);
    store.touch_refreshed();
    assert_eq!(storage.get(CacheKey::Items.as_str()).unwrap(), None);
    assert_eq!(storage.get(CacheKey::RefreshedAt.as_str()).unwrap(), None);
    assert_eq!(store.last_refreshed(), None);

    // Pre-existing entries are left untouched
    assert!(storage.get(CacheKey::Categories.as_str()).unwrap().is_some());
  }

  #[test]
  fn test_refreshed_at_is_bare_number() {
    let (store, storage) = store_with(true);
    assert_eq!(store.last_refreshed(), None);

    store.touch_refreshed();
    let raw = storage.get(CacheKey::RefreshedAt.as_str()).unwrap().unwrap();
    let parsed: i64 = raw.parse().unwrap();
    assert_eq!(store.last_refreshed(), Some(parsed));

    storage.set(CacheKey::RefreshedAt.as_str(), "garbage").unwrap();
    assert_eq!(store.last_refreshed(), None);
  }

  #[test]
  fn test_delete_and_clear_all() {
    let (store, _) = store_with(true);
    store.set(CacheKey::Items, &vec![1]);
    store.set(CacheKey::Categories, &vec!["a"]);
    store.set(CacheKey::Groups, &vec![2]);

    store.delete(CacheKey::Items).unwrap();
    assert_eq!(store.get::<Vec<i32>>(CacheKey::Items), None);
    assert_eq!(store.get::<Vec<i32>>(CacheKey::Groups), Some(vec![2]));

    store.clear_all().unwrap();
    assert_eq!(store.get::<Vec<String>>(CacheKey::Categories), None);
    assert_eq!(store.get::<Vec<i32>>(CacheKey::Groups), None);
  }

  #[test]
  fn test_clear_works_while_disabled() {
    let storage = Arc::new(MemoryStorage::new());
    write_raw(&storage, CacheKey::Items, now_ms(), "[]");

    let store = CacheStore::new(storage.clone(), &config(false, 48));
    store.clear_all().unwrap();
    assert_eq!(storage.get(CacheKey::Items.as_str()).unwrap(), None);
  }
}
