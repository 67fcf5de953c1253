//! Network plumbing: cancellation, transport and retry.

mod cancel;
mod error;
mod retry;
mod transport;

pub use cancel::CancelToken;
pub use error::{FetchError, TransportError};
pub use retry::{fetch_with_retry, RetryPolicy};
pub use transport::{HttpTransport, Transport};

#[cfg(test)]
pub mod testing;
