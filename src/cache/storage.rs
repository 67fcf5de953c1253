//! Key/value storage backends for the cache.

use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// Trait for durable string key/value backends.
pub trait KvStorage: Send + Sync {
  fn get(&self, key: &str) -> Result<Option<String>>;

  /// Insert or replace the value stored under `key`.
  fn set(&self, key: &str, value: &str) -> Result<()>;

  fn delete(&self, key: &str) -> Result<()>;

  /// Remove every key owned by this backend.
  fn clear(&self) -> Result<()>;
}

/// In-process storage, lost on exit. Used by tests and as a fallback when the
/// database can not be opened.
#[derive(Debug, Default)]
pub struct MemoryStorage {
  entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }
}

impl KvStorage for MemoryStorage {
  fn get(&self, key: &str) -> Result<Option<String>> {
    let entries = self
      .entries
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    Ok(entries.get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> Result<()> {
    let mut entries = self
      .entries
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    entries.insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn delete(&self, key: &str) -> Result<()> {
    let mut entries = self
      .entries
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    entries.remove(key);
    Ok(())
  }

  fn clear(&self) -> Result<()> {
    let mut entries = self
      .entries
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    entries.clear();
    Ok(())
  }
}

/// SQLite-based storage. All keys live under one namespace so that clearing
/// never touches rows written by anything else sharing the file.
pub struct SqliteStorage {
  conn: Mutex<Connection>,
  namespace: String,
}

const NAMESPACE: &str = "deckview";

/// Schema for the key/value table.
const CACHE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS kv_cache (
    namespace TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    written_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (namespace, key)
);
"#;

impl SqliteStorage {
  /// Open (or create) the cache database at `path`.
  pub fn open(path: &Path) -> Result<Self> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create cache directory: {}", e))?;
    }

    let conn = Connection::open(path)
      .map_err(|e| eyre!("Failed to open cache database at {}: {}", path.display(), e))?;

    let storage = Self {
      conn: Mutex::new(conn),
      namespace: NAMESPACE.to_string(),
    };
    storage.run_migrations()?;

    Ok(storage)
  }

  /// Run database migrations for the cache table.
  fn run_migrations(&self) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute_batch(CACHE_SCHEMA)
      .map_err(|e| eyre!("Failed to run cache migrations: {}", e))?;

    Ok(())
  }
}

impl KvStorage for SqliteStorage {
  fn get(&self, key: &str) -> Result<Option<String>> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .query_row(
        "SELECT value FROM kv_cache WHERE namespace = ? AND key = ?",
        params![self.namespace, key],
        |row| row.get(0),
      )
      .optional()
      .map_err(|e| eyre!("Failed to read cache key {}: {}", key, e))
  }

  fn set(&self, key: &str, value: &str) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute(
        "INSERT OR REPLACE INTO kv_cache (namespace, key, value, written_at)
         VALUES (?, ?, ?, datetime('now'))",
        params![self.namespace, key, value],
      )
      .map_err(|e| eyre!("Failed to write cache key {}: {}", key, e))?;

    Ok(())
  }

  fn delete(&self, key: &str) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute(
        "DELETE FROM kv_cache WHERE namespace = ? AND key = ?",
        params![self.namespace, key],
      )
      .map_err(|e| eyre!("Failed to delete cache key {}: {}", key, e))?;

    Ok(())
  }

  fn clear(&self) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute(
        "DELETE FROM kv_cache WHERE namespace = ?",
        params![self.namespace],
      )
      .map_err(|e| eyre!("Failed to clear cache: {}", e))?;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn exercise(storage: &dyn KvStorage) {
    assert_eq!(storage.get("a").unwrap(), None);

    storage.set("a", "1").unwrap();
    storage.set("b", "2").unwrap();
    assert_eq!(storage.get("a").unwrap().as_deref(), Some("1"));

    // Replace, never mutate in place
    storage.set("a", "3").unwrap();
    assert_eq!(storage.get("a").unwrap().as_deref(), Some("3"));

    storage.delete("a").unwrap();
    assert_eq!(storage.get("a").unwrap(), None);
    assert_eq!(storage.get("b").unwrap().as_deref(), Some("2"));

    // Deleting a missing key is fine
    storage.delete("a").unwrap();

    storage.clear().unwrap();
    assert_eq!(storage.get("b").unwrap(), None);
  }

  #[test]
  fn test_memory_storage() {
    let storage = MemoryStorage::new();
    exercise(&storage);
    assert!(storage.entries.lock().unwrap().is_empty());
  }

  #[test]
  fn test_sqlite_storage() {
    let dir = tempfile::tempdir().unwrap();
    let storage = SqliteStorage::open(&dir.path().join("nested").join("cache.db")).unwrap();
    exercise(&storage);
  }

  #[test]
  fn test_sqlite_storage_persists_across_opens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.db");

    {
      let storage = SqliteStorage::open(&path).unwrap();
      storage.set("catalog.items", "[]").unwrap();
    }

    let storage = SqliteStorage::open(&path).unwrap();
    assert_eq!(
      storage.get("catalog.items").unwrap().as_deref(),
      Some("[]")
    );
  }

  #[test]
  fn test_sqlite_clear_only_touches_own_namespace() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.db");
    let storage = SqliteStorage::open(&path).unwrap();
    storage.set("k", "mine").unwrap();

    {
      let conn = storage.conn.lock().unwrap();
      conn
        .execute(
          "INSERT INTO kv_cache (namespace, key, value) VALUES ('other', 'k', 'theirs')",
          [],
        )
        .unwrap();
    }

    storage.clear().unwrap();
    assert_eq!(storage.get("k").unwrap(), None);

    let conn = storage.conn.lock().unwrap();
    let remaining: i64 = conn
      .query_row("SELECT COUNT(*) FROM kv_cache", [], |row| row.get(0))
      .unwrap();
    assert_eq!(remaining, 1);
  }
}
