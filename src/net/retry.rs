//! Bounded retry with a fixed delay and cooperative cancellation.

use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use super::cancel::CancelToken;
use super::error::FetchError;
use crate::config::RetryConfig;

/// How many times to retry and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  /// Additional attempts after the first one
  pub max_retries: u32,
  /// Fixed wait between attempts
  pub delay: Duration,
}

impl RetryPolicy {
  pub fn new(max_retries: u32, delay: Duration) -> Self {
    Self { max_retries, delay }
  }

  pub fn total_attempts(&self) -> u32 {
    self.max_retries + 1
  }
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self::new(2, Duration::from_millis(1000))
  }
}

impl From<&RetryConfig> for RetryPolicy {
  fn from(config: &RetryConfig) -> Self {
    Self::new(config.max_retries, Duration::from_millis(config.delay_ms))
  }
}

/// Run `operation` until it succeeds or the retry budget is spent.
///
/// Each call of `operation` performs exactly one attempt and receives the
/// cancellation token. The token is checked before every attempt and after
/// every failed one, including the last. Once it fires no further attempt
/// starts, a pending wait is cut short and `FetchError::Aborted` is returned.
/// Aborted attempts are never retried. When the budget runs out the last
/// error is returned as is.
pub async fn fetch_with_retry<T, F, Fut>(
  mut operation: F,
  policy: RetryPolicy,
  cancel: &CancelToken,
) -> Result<T, FetchError>
where
  F: FnMut(CancelToken) -> Fut,
  Fut: Future<Output = Result<T, FetchError>>,
{
  let mut attempt: u32 = 0;

  loop {
    if cancel.is_cancelled() {
      debug!(attempt, "cancelled before attempt");
      return Err(FetchError::Aborted);
    }

    let err = match operation(cancel.clone()).await {
      Ok(value) => return Ok(value),
      Err(err) if err.is_aborted() => return Err(err),
      Err(err) => err,
    };

    if cancel.is_cancelled() {
      debug!(attempt, error = %err, "cancelled during attempt");
      return Err(FetchError::Aborted);
    }

    if attempt >= policy.max_retries {
      warn!(attempts = policy.total_attempts(), error = %err, "giving up after retries");
      return Err(err);
    }
    attempt += 1;

    debug!(
      attempt,
      max_retries = policy.max_retries,
      delay_ms = policy.delay.as_millis() as u64,
      error = %err,
      "attempt failed, retrying"
    );

    tokio::select! {
      biased;
      _ = cancel.cancelled() => return Err(FetchError::Aborted),
      _ = tokio::time::sleep(policy.delay) => {}
    }
  }
}
