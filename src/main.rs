mod app;
mod cache;
mod catalog;
mod config;
mod event;
mod logging;
mod net;
mod pagination;
mod query;
mod ui;

use cache::{CacheKey, CacheStore, KvStorage, MemoryStorage, SqliteStorage};
use catalog::CatalogClient;
use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use net::{HttpTransport, RetryPolicy};
use query::CatalogQuery;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "deckview")]
#[command(about = "A terminal browser for collectible card catalogs, with offline cache")]
#[command(version)]
struct Args {
  /// Path to config file (default: ./deckview.yaml, then $XDG_CONFIG_HOME/deckview/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Always fetch from the network and never write the cache
  #[arg(long)]
  no_cache: bool,

  /// Items revealed per page
  #[arg(long)]
  page_size: Option<usize>,

  /// Remove every cached entry and exit
  #[arg(long, conflicts_with = "clear_key")]
  clear_cache: bool,

  /// Remove one cached artifact and exit
  #[arg(long, value_enum, value_name = "KEY")]
  clear_key: Option<CacheKey>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration, then apply command line overrides
  let mut config = config::Config::load(args.config.as_deref())?;
  if args.no_cache {
    config.cache.enabled = false;
  }
  if let Some(page_size) = args.page_size {
    if page_size == 0 {
      return Err(eyre!("--page-size must be greater than zero"));
    }
    config.ui.page_size = page_size;
  }

  let data_dir = config::Config::data_dir()?;
  logging::init(&logging::log_path(&data_dir));
  info!(version = env!("CARGO_PKG_VERSION"), "deckview starting");

  let storage = open_storage(config.cache.path.as_deref(), &data_dir);
  let cache = CacheStore::new(storage, &config.cache);
  info!(
    enabled = cache.is_enabled(),
    ttl_hours = cache.ttl().as_secs() / 3600,
    "cache ready"
  );

  if let Some(message) = clear_requested(&args, &cache)? {
    println!("{}", message);
    return Ok(());
  }

  let transport = Arc::new(HttpTransport::new(&config.api)?);
  let client = CatalogClient::new(transport, &config.api, RetryPolicy::from(&config.retry));
  let query = CatalogQuery::new(client, cache);

  // Initialize and run the app
  let mut app = app::App::new(config, query);
  app.run().await?;

  info!("deckview exited");
  Ok(())
}

/// SQLite cache at the configured path (default `<data dir>/cache.db`).
///
/// A cache that can not be opened degrades to memory for this session.
fn open_storage(path: Option<&Path>, data_dir: &Path) -> Arc<dyn KvStorage> {
  let path = path
    .map(Path::to_path_buf)
    .unwrap_or_else(|| data_dir.join("cache.db"));

  match SqliteStorage::open(&path) {
    Ok(storage) => Arc::new(storage),
    Err(e) => {
      warn!(path = %path.display(), error = %e, "cache unavailable, using memory");
      Arc::new(MemoryStorage::new())
    }
  }
}

/// Handle `--clear-cache` / `--clear-key`. Returns the message to print when
/// one of them ran.
fn clear_requested(args: &Args, cache: &CacheStore) -> Result<Option<String>> {
  if args.clear_cache {
    cache.clear_all()?;
    info!("cache cleared");
    return Ok(Some("Cache cleared.".to_string()));
  }
  if let Some(key) = args.clear_key {
    cache.delete(key)?;
    info!(key = key.as_str(), "cache entry removed");
    return Ok(Some(format!("Removed {} from the cache.", key.as_str())));
  }
  Ok(None)
}
