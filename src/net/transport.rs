//! Raw HTTP transport used by the catalog client.

use color_eyre::{eyre::eyre, Result};
use futures::future::{BoxFuture, FutureExt};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::cancel::CancelToken;
use super::error::TransportError;
use crate::config::ApiConfig;

/// Capability to issue a single GET request.
///
/// Implementations must resolve with `TransportError::aborted()` once `cancel`
/// fires, and must report non-2xx answers with their status code.
pub trait Transport: Send + Sync {
  fn get<'a>(
    &'a self,
    path: &'a str,
    params: &'a [(String, String)],
    cancel: &'a CancelToken,
  ) -> BoxFuture<'a, Result<Value, TransportError>>;
}

/// reqwest-backed transport against a configured base URL.
pub struct HttpTransport {
  client: reqwest::Client,
  base_url: String,
}

impl HttpTransport {
  pub fn new(config: &ApiConfig) -> Result<Self> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    for (name, value) in &config.headers {
      let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| eyre!("Invalid header name '{}': {}", name, e))?;
      let header_value = HeaderValue::from_str(value)
        .map_err(|e| eyre!("Invalid value for header '{}': {}", name, e))?;
      headers.insert(header_name, header_value);
    }

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .user_agent(format!("deckview/{}", env!("CARGO_PKG_VERSION")))
      .default_headers(headers)
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    // Reject a malformed base URL at startup
    Url::parse(&config.base_url)
      .map_err(|e| eyre!("Invalid API base URL '{}': {}", config.base_url, e))?;

    Ok(Self {
      client,
      base_url: config.base_url.clone(),
    })
  }

  fn endpoint(&self, path: &str, params: &[(String, String)]) -> Result<Url, TransportError> {
    build_url(&self.base_url, path, params)
  }
}

/// Join `path` onto `base` (keeping any base path) and append query params.
fn build_url(base: &str, path: &str, params: &[(String, String)]) -> Result<Url, TransportError> {
  let joined = format!(
    "{}/{}",
    base.trim_end_matches('/'),
    path.trim_start_matches('/')
  );
  let mut url = Url::parse(&joined)
    .map_err(|e| TransportError::other(format!("Invalid URL {}: {}", joined, e)))?;
  if !params.is_empty() {
    url.query_pairs_mut().extend_pairs(params);
  }
  Ok(url)
}

impl Transport for HttpTransport {
  fn get<'a>(
    &'a self,
    path: &'a str,
    params: &'a [(String, String)],
    cancel: &'a CancelToken,
  ) -> BoxFuture<'a, Result<Value, TransportError>> {
    async move {
      let url = self.endpoint(path, params)?;
      debug!(%url, "GET");

      let request = async {
        let response = self
          .client
          .get(url)
          .send()
          .await
          .map_err(|e| TransportError::other(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
          return Err(TransportError::status(
            status.as_u16(),
            format!("Request failed with status code {}", status.as_u16()),
          ));
        }

        response
          .json::<Value>()
          .await
          .map_err(|e| TransportError::other(format!("Failed to decode response: {}", e)))
      };

      tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(TransportError::aborted()),
        result = request => result,
      }
    }
    .boxed()
  }
}
