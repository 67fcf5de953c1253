//! Cooperative cancellation token shared between a load and its fetch task.

use std::sync::Arc;
use tokio::sync::watch;

/// A clonable cancellation flag.
///
/// Every clone observes the same flag. Cancelling is idempotent and can not be
/// undone; a new load gets a new token.
#[derive(Debug, Clone)]
pub struct CancelToken {
  tx: Arc<watch::Sender<bool>>,
}

impl CancelToken {
  pub fn new() -> Self {
    let (tx, _rx) = watch::channel(false);
    Self { tx: Arc::new(tx) }
  }

  /// Signal cancellation to every holder of this token.
  pub fn cancel(&self) {
    self.tx.send_replace(true);
  }

  pub fn is_cancelled(&self) -> bool {
    *self.tx.borrow()
  }

  /// Resolve once the token has been cancelled.
  ///
  /// Resolves immediately if cancellation already happened.
  pub async fn cancelled(&self) {
    let mut rx = self.tx.subscribe();
    // The sender lives as long as `self`, so this can only fail if it was dropped.
    let _ = rx.wait_for(|cancelled| *cancelled).await;
  }
}

impl Default for CancelToken {
  fn default() -> Self {
    Self::new()
  }
}
