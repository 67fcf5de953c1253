//! Local persistence for the fetched catalog.
//!
//! This module provides:
//! - `KvStorage` backends (SQLite on disk, in-memory for tests)
//! - `CacheStore`, which wraps every artifact in a `{timestamp, data}`
//!   envelope and treats anything older than the TTL as a miss

mod storage;
mod store;

pub use storage::{KvStorage, MemoryStorage, SqliteStorage};
pub use store::{CacheKey, CacheStore};
