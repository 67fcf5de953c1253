use std::sync::Arc;
use tracing::info;

use super::api_types::flatten_response;
use super::types::Item;
use crate::config::ApiConfig;
use crate::net::{fetch_with_retry, CancelToken, FetchError, RetryPolicy, Transport};

/// Listing endpoint, relative to the API base URL.
pub const CARDS_PATH: &str = "/cards";

/// Prefix for errors carrying an HTTP status.
const FETCH_CONTEXT: &str = "Failed to fetch cards";

/// Card listing API client.
#[derive(Clone)]
pub struct CatalogClient {
  transport: Arc<dyn Transport>,
  params: Vec<(String, String)>,
  policy: RetryPolicy,
}

impl CatalogClient {
  pub fn new(transport: Arc<dyn Transport>, api: &ApiConfig, policy: RetryPolicy) -> Self {
    let params = vec![
      ("collectible".to_string(), api.collectible.clone()),
      ("locale".to_string(), api.locale.clone()),
    ];
    Self {
      transport,
      params,
      policy,
    }
  }

  /// One request, status classified at the point where it is known.
  async fn fetch_once(&self, cancel: &CancelToken) -> Result<serde_json::Value, FetchError> {
    self
      .transport
      .get(CARDS_PATH, &self.params, cancel)
      .await
      .map_err(|e| FetchError::classify(FETCH_CONTEXT, e))
  }

  /// Fetch every collectible card that has an image, retrying per policy.
  pub async fn fetch_all_items(&self, cancel: &CancelToken) -> Result<Vec<Item>, FetchError> {
    let body = fetch_with_retry(
      |token| async move { self.fetch_once(&token).await },
      self.policy,
      cancel,
    )
    .await?;

    let items = flatten_response(body)
      .ok_or_else(|| FetchError::Unknown("Unexpected response format from card API".to_string()))?;
    info!(count = items.len(), "fetched catalog");
    Ok(items)
  }
}
