use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub api: ApiConfig,
  #[serde(default)]
  pub cache: CacheConfig,
  #[serde(default)]
  pub retry: RetryConfig,
  #[serde(default)]
  pub ui: UiConfig,
  /// Custom title for header (defaults to the API host)
  pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
  pub base_url: String,
  pub locale: String,
  /// Value of the `collectible` query parameter ("1" selects collectible cards only)
  pub collectible: String,
  pub timeout_secs: u64,
  /// Extra static headers sent with every request
  pub headers: BTreeMap<String, String>,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: "https://omgvamp-hearthstone-v1.p.rapidapi.com".to_string(),
      locale: "enUS".to_string(),
      collectible: "1".to_string(),
      timeout_secs: 320,
      headers: BTreeMap::from([(
        "x-rapidapi-host".to_string(),
        "omgvamp-hearthstone-v1.p.rapidapi.com".to_string(),
      )]),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
  pub enabled: bool,
  pub duration_hours: u64,
  /// SQLite file (default: $XDG_DATA_HOME/deckview/cache.db)
  pub path: Option<PathBuf>,
}

impl CacheConfig {
  pub fn ttl(&self) -> Duration {
    Duration::from_secs(self.duration_hours.saturating_mul(60 * 60))
  }
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      duration_hours: 48,
      path: None,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
  /// Attempts after the first one
  pub max_retries: u32,
  pub delay_ms: u64,
}

impl Default for RetryConfig {
  fn default() -> Self {
    Self {
      max_retries: 2,
      delay_ms: 1000,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
  pub page_size: usize,
  /// Search terms shorter than this show the category list instead
  pub min_search_len: usize,
  pub search_debounce_ms: u64,
}

impl Default for UiConfig {
  fn default() -> Self {
    Self {
      page_size: 10,
      min_search_len: 2,
      search_debounce_ms: 300,
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./deckview.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/deckview/config.yaml
  ///
  /// Without any file the built-in defaults are used.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("deckview.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("deckview").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn from_yaml(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents)?;
    if config.ui.page_size == 0 {
      return Err(eyre!("ui.page_size must be greater than zero"));
    }
    Ok(config)
  }

  /// Directory for the cache database and logs.
  pub fn data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("deckview"))
  }

  /// Header title: explicit `title`, else the API host.
  pub fn display_title(&self) -> &str {
    if let Some(title) = &self.title {
      return title;
    }
    let url = &self.api.base_url;
    url
      .strip_prefix("https://")
      .or_else(|| url.strip_prefix("http://"))
      .unwrap_or(url)
      .split('/')
      .next()
      .unwrap_or(url)
  }
}
