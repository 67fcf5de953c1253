//! Catalog loading state machine.
//!
//! `CatalogQuery` owns the read-cache-else-fetch cycle for the catalog:
//!
//! ```ignore
//! let mut query = CatalogQuery::new(client, cache);
//!
//! // Mount: serve a fresh cache snapshot or start fetching
//! query.start();
//!
//! // In event loop tick
//! if query.poll() {
//!     // State changed, trigger re-render
//! }
//!
//! // In render
//! match query.state() {
//!     LoadState::Loading => render_spinner(),
//!     LoadState::Success => render_data(query.catalog()),
//!     LoadState::Error(e) => render_error(e),
//!     LoadState::Idle | LoadState::Aborted => {}
//! }
//! ```
//!
//! Each fetch runs on its own task with its own `CancelToken`. Starting a new
//! fetch cancels the previous token and drops its result channel, and every
//! commit re-checks the token, so a superseded or torn-down fetch can never
//! overwrite state or cache.

use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::cache::{CacheKey, CacheStore};
use crate::catalog::{Catalog, CatalogClient, Groups, Item};
use crate::net::{CancelToken, FetchError};

/// Lifecycle of a catalog load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
  /// Nothing has been started
  Idle,
  /// A fetch is in flight
  Loading,
  /// Data is available (from cache or network)
  Success,
  /// The last fetch failed after retries
  Error(FetchError),
  /// The in-flight fetch was cancelled; not an error
  Aborted,
}

impl LoadState {
  pub fn is_loading(&self) -> bool {
    matches!(self, LoadState::Loading)
  }

  pub fn error(&self) -> Option<&FetchError> {
    match self {
      LoadState::Error(e) => Some(e),
      _ => None,
    }
  }
}

type FetchResult = Result<Vec<Item>, FetchError>;

/// A fetch that has been started but not committed.
struct Pending {
  generation: u64,
  cancel: CancelToken,
  receiver: oneshot::Receiver<FetchResult>,
}

/// Loads the catalog through the cache and keeps the last good snapshot.
pub struct CatalogQuery {
  client: CatalogClient,
  cache: CacheStore,
  state: LoadState,
  catalog: Catalog,
  pending: Option<Pending>,
  generation: u64,
}

impl CatalogQuery {
  pub fn new(client: CatalogClient, cache: CacheStore) -> Self {
    Self {
      client,
      cache,
      state: LoadState::Idle,
      catalog: Catalog::default(),
      pending: None,
      generation: 0,
    }
  }

  /// Serve a fresh cached snapshot if all three artifacts are valid,
  /// otherwise start fetching.
  pub fn start(&mut self) {
    if let Some(catalog) = self.read_cache() {
      self.cancel_pending();
      info!(
        items = catalog.items.len(),
        categories = catalog.categories.len(),
        "catalog served from cache"
      );
      self.catalog = catalog;
      self.state = LoadState::Success;
      return;
    }
    debug!("catalog cache miss");
    self.start_fetch();
  }

  /// Fetch from the network regardless of the cache, superseding any
  /// in-flight fetch.
  pub fn refresh(&mut self) {
    self.start_fetch();
  }

  /// Tear down: cancel the in-flight fetch, if any. Its result is discarded.
  pub fn cancel(&mut self) {
    if self.cancel_pending() {
      self.state = LoadState::Aborted;
    }
  }

  /// Commit a finished fetch, if one is ready. Never blocks.
  ///
  /// Returns `true` if the state changed. Call this in the event loop tick.
  pub fn poll(&mut self) -> bool {
    let Some(mut pending) = self.pending.take() else {
      return false;
    };

    let result = match pending.receiver.try_recv() {
      Ok(result) => result,
      Err(oneshot::error::TryRecvError::Empty) => {
        self.pending = Some(pending);
        return false;
      }
      Err(oneshot::error::TryRecvError::Closed) => Err(lost_task_error()),
    };

    self.commit(pending, result)
  }

  /// Wait for the in-flight fetch and commit it.
  ///
  /// Returns `true` if the state changed; `false` if nothing was pending.
  pub async fn wait(&mut self) -> bool {
    let Some(mut pending) = self.pending.take() else {
      return false;
    };

    let result = match (&mut pending.receiver).await {
      Ok(result) => result,
      Err(_) => Err(lost_task_error()),
    };

    self.commit(pending, result)
  }

  pub fn state(&self) -> &LoadState {
    &self.state
  }

  pub fn is_loading(&self) -> bool {
    self.state.is_loading()
  }

  pub fn error(&self) -> Option<&FetchError> {
    self.state.error()
  }

  /// Last good snapshot; empty until the first successful load.
  pub fn catalog(&self) -> &Catalog {
    &self.catalog
  }

  /// Epoch-ms of the last refresh recorded in the cache.
  pub fn last_refreshed(&self) -> Option<i64> {
    self.cache.last_refreshed()
  }

  fn start_fetch(&mut self) {
    self.cancel_pending();

    self.generation += 1;
    let generation = self.generation;
    let cancel = CancelToken::new();
    let (tx, rx) = oneshot::channel();

    let client = self.client.clone();
    let token = cancel.clone();
    tokio::spawn(async move {
      let result = client.fetch_all_items(&token).await;
      // Ignore send errors - a superseded load dropped its receiver
      let _ = tx.send(result);
    });

    debug!(generation, "catalog fetch started");
    self.pending = Some(Pending {
      generation,
      cancel,
      receiver: rx,
    });
    self.state = LoadState::Loading;
  }

  /// Cancel and forget the in-flight fetch. Returns whether there was one.
  fn cancel_pending(&mut self) -> bool {
    match self.pending.take() {
      Some(pending) => {
        pending.cancel.cancel();
        debug!(generation = pending.generation, "catalog fetch cancelled");
        true
      }
      None => false,
    }
  }

  fn commit(&mut self, pending: Pending, result: FetchResult) -> bool {
    if pending.cancel.is_cancelled() || pending.generation != self.generation {
      debug!(generation = pending.generation, "discarding stale fetch result");
      return false;
    }

    match result {
      Ok(items) => {
        let catalog = Catalog::from_items(items);
        self.write_cache(&catalog);
        info!(
          generation = pending.generation,
          items = catalog.items.len(),
          categories = catalog.categories.len(),
          "catalog loaded"
        );
        self.catalog = catalog;
        self.state = LoadState::Success;
      }
      Err(FetchError::Aborted) => {
        debug!(generation = pending.generation, "catalog fetch aborted");
        self.state = LoadState::Aborted;
      }
      Err(err) => {
        warn!(generation = pending.generation, error = %err, "catalog fetch failed");
        self.state = LoadState::Error(err);
      }
    }
    true
  }

  /// All three artifacts must be present and fresh; partial hits are misses.
  fn read_cache(&self) -> Option<Catalog> {
    let items: Vec<Item> = self.cache.get(CacheKey::Items)?;
    let categories: Vec<String> = self.cache.get(CacheKey::Categories)?;
    let groups: Groups = self.cache.get(CacheKey::Groups)?;
    Some(Catalog::from_parts(items, categories, groups))
  }

  fn write_cache(&self, catalog: &Catalog) {
    self.cache.set(CacheKey::Items, catalog.items.as_ref());
    self.cache.set(CacheKey::Categories, catalog.categories.as_ref());
    self.cache.set(CacheKey::Groups, catalog.groups.as_ref());
    self.cache.touch_refreshed();
  }
}

impl Drop for CatalogQuery {
  fn drop(&mut self) {
    self.cancel_pending();
  }
}

fn lost_task_error() -> FetchError {
  FetchError::Unknown("Catalog fetch ended without a result".to_string())
}

impl std::fmt::Debug for CatalogQuery {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CatalogQuery")
      .field("state", &self.state)
      .field("items", &self.catalog.items.len())
      .field("generation", &self.generation)
      .finish_non_exhaustive()
  }
}
