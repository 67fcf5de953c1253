//! Fake transports for tests.

use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::oneshot;

use super::cancel::CancelToken;
use super::error::TransportError;
use super::transport::Transport;

type Call = (String, Vec<(String, String)>);
type Response = Result<Value, TransportError>;

/// Answers each request with the next scripted response, immediately.
pub struct ScriptedTransport {
  responses: Mutex<VecDeque<Response>>,
  calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
  pub fn new(responses: Vec<Response>) -> Self {
    Self {
      responses: Mutex::new(responses.into()),
      calls: Mutex::new(Vec::new()),
    }
  }

  pub fn calls(&self) -> Vec<Call> {
    self.calls.lock().unwrap().clone()
  }
}

impl Transport for ScriptedTransport {
  fn get<'a>(
    &'a self,
    path: &'a str,
    params: &'a [(String, String)],
    _cancel: &'a CancelToken,
  ) -> BoxFuture<'a, Response> {
    self
      .calls
      .lock()
      .unwrap()
      .push((path.to_string(), params.to_vec()));
    let response = self
      .responses
      .lock()
      .unwrap()
      .pop_front()
      .unwrap_or_else(|| Err(TransportError::other("no scripted response")));
    async move { response }.boxed()
  }
}

/// Holds every request open until the test resolves it by index.
///
/// With `honor_cancel` off the request ignores its token, like a transport
/// that can not abort an in-flight call.
pub struct GatedTransport {
  pending: Mutex<Vec<Option<oneshot::Sender<Response>>>>,
  honor_cancel: bool,
}

impl GatedTransport {
  pub fn new(honor_cancel: bool) -> Self {
    Self {
      pending: Mutex::new(Vec::new()),
      honor_cancel,
    }
  }

  pub fn call_count(&self) -> usize {
    self.pending.lock().unwrap().len()
  }

  /// Wait until at least `n` requests have been issued.
  pub async fn wait_for_calls(&self, n: usize) {
    tokio::time::timeout(Duration::from_secs(2), async {
      while self.call_count() < n {
        tokio::time::sleep(Duration::from_millis(1)).await;
      }
    })
    .await
    .expect("expected request was never issued");
  }

  /// Whether request `index` was dropped by its caller without an answer.
  pub fn is_abandoned(&self, index: usize) -> bool {
    match self.pending.lock().unwrap().get(index) {
      Some(Some(sender)) => sender.is_closed(),
      _ => false,
    }
  }

  pub fn resolve(&self, index: usize, response: Response) {
    let sender = self.pending.lock().unwrap()[index]
      .take()
      .expect("request already resolved");
    // The request may have been abandoned already
    let _ = sender.send(response);
  }
}

impl Transport for GatedTransport {
  fn get<'a>(
    &'a self,
    _path: &'a str,
    _params: &'a [(String, String)],
    cancel: &'a CancelToken,
  ) -> BoxFuture<'a, Response> {
    let (tx, rx) = oneshot::channel();
    self.pending.lock().unwrap().push(Some(tx));
    let honor_cancel = self.honor_cancel;

    async move {
      let answer = async {
        rx.await
          .unwrap_or_else(|_| Err(TransportError::other("gate dropped")))
      };
      if honor_cancel {
        tokio::select! {
          biased;
          _ = cancel.cancelled() => Err(TransportError::aborted()),
          response = answer => response,
        }
      } else {
        answer.await
      }
    }
    .boxed()
  }
}
