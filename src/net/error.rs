//! Error types for the remote fetch path.

use thiserror::Error;

/// Failure reported by a transport for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
  /// HTTP status, when the server answered with a non-2xx response
  pub status: Option<u16>,
  pub message: String,
  /// The request was abandoned because its cancellation token fired
  pub aborted: bool,
}

impl TransportError {
  /// A failure without a response (connect error, timeout, bad body).
  pub fn other(message: impl Into<String>) -> Self {
    Self {
      status: None,
      message: message.into(),
      aborted: false,
    }
  }

  /// The server answered with a non-success status.
  pub fn status(status: u16, message: impl Into<String>) -> Self {
    Self {
      status: Some(status),
      message: message.into(),
      aborted: false,
    }
  }

  pub fn aborted() -> Self {
    Self {
      status: None,
      message: "request aborted".to_string(),
      aborted: true,
    }
  }
}

/// Classified outcome of a failed fetch.
///
/// `Aborted` is not a failure: it means the caller cancelled and the result
/// must be dropped without touching error state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
  #[error("aborted")]
  Aborted,
  /// The server answered with a status code
  #[error("{context}: {status}")]
  Status { context: String, status: u16 },
  /// Anything without a recognizable status keeps its original message
  #[error("{0}")]
  Unknown(String),
}

impl FetchError {
  /// Classify a transport failure, attaching `context` when a status is known.
  pub fn classify(context: &str, err: TransportError) -> Self {
    if err.aborted {
      return Self::Aborted;
    }
    match err.status {
      Some(status) => Self::Status {
        context: context.to_string(),
        status,
      },
      None => Self::Unknown(err.message),
    }
  }

  pub fn is_aborted(&self) -> bool {
    matches!(self, Self::Aborted)
  }
}
