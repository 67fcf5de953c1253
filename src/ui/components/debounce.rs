use std::time::{Duration, Instant};

/// Holds back a value until it has been stable for `delay`.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
  delay: Duration,
  pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
  pub fn new(delay: Duration) -> Self {
    Self {
      delay,
      pending: None,
    }
  }

  /// Replace the pending value and restart the delay.
  pub fn push(&mut self, value: T, now: Instant) {
    self.pending = Some((value, now));
  }

  /// Skip the delay for the pending value.
  pub fn flush(&mut self) -> Option<T> {
    self.pending.take().map(|(value, _)| value)
  }

  /// Release the pending value once its delay has elapsed.
  pub fn poll(&mut self, now: Instant) -> Option<T> {
    let ready = matches!(
      &self.pending,
      Some((_, since)) if now.saturating_duration_since(*since) >= self.delay
    );
    if ready {
      self.flush()
    } else {
      None
    }
  }
}
