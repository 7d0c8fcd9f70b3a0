//! Bounded retries with exponential backoff around any oracle transport.

use std::{future::Future, time::Duration};

use rapport_core::{
  ask::AnswerOracle,
  oracle::{ComparisonOracle, ComparisonRequest},
};

use crate::{Error, OracleConfig, Result};

const MAX_BACKOFF: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  /// Total attempts including the first. Values below 1 are treated as 1.
  pub max_attempts:    u32,
  pub initial_backoff: Duration,
  /// Deadline for a single attempt.
  pub timeout:         Duration,
}

impl RetryPolicy {
  /// Delay before attempt `attempt + 1`, doubling from `initial_backoff`.
  fn backoff(&self, attempt: u32) -> Duration {
    let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
    self.initial_backoff.saturating_mul(factor).min(MAX_BACKOFF)
  }
}

impl Default for RetryPolicy {
  fn default() -> Self { RetryPolicy::from(&OracleConfig::default()) }
}

impl From<&OracleConfig> for RetryPolicy {
  fn from(config: &OracleConfig) -> Self {
    Self {
      max_attempts:    config.max_attempts,
      initial_backoff: Duration::from_millis(config.initial_backoff_ms),
      timeout:         Duration::from_secs(config.timeout_secs),
    }
  }
}

/// Wraps an oracle so each call gets a deadline and transient failures are
/// repeated. When attempts run out the caller sees [`Error::Unavailable`],
/// never an empty answer.
pub struct Retrying<O> {
  inner:  O,
  policy: RetryPolicy,
}

impl<O> Retrying<O> {
  pub fn new(inner: O, policy: RetryPolicy) -> Self { Self { inner, policy } }

  pub fn inner(&self) -> &O { &self.inner }

  /// Run `call` until it succeeds, fails permanently, or attempts run out.
  /// `task` names the call in logs.
  async fn attempt<F, Fut, E>(
    &self,
    task: &str,
    mut call: F,
    is_retryable: impl Fn(&E) -> bool,
  ) -> Result<String>
  where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String, E>>,
    E: std::error::Error + Send + Sync + 'static,
  {
    let max_attempts = self.policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
      attempt += 1;

      let (last, retryable): (Box<dyn std::error::Error + Send + Sync>, bool) =
        match tokio::time::timeout(self.policy.timeout, call()).await {
          Ok(Ok(text)) => return Ok(text),
          Ok(Err(e)) => {
            let retryable = is_retryable(&e);
            (Box::new(e), retryable)
          }
          Err(_) => (Box::new(Error::Timeout(self.policy.timeout)), true),
        };

      if !retryable || attempt >= max_attempts {
        return Err(Error::Unavailable { attempts: attempt, last });
      }

      let delay = self.policy.backoff(attempt);
      tracing::warn!(
        task,
        attempt,
        max_attempts,
        delay_ms = delay.as_millis() as u64,
        error = %last,
        "oracle call failed; retrying",
      );
      tokio::time::sleep(delay).await;
    }
  }
}

impl<O: ComparisonOracle> ComparisonOracle for Retrying<O> {
  type Error = Error;

  async fn compare<'a>(&'a self, request: &'a ComparisonRequest) -> Result<String> {
    let inner = &self.inner;
    let task = format!("compare {}", request.dimension);
    self
      .attempt(&task, move || inner.compare(request), |e| inner.is_retryable(e))
      .await
  }

  fn is_retryable(&self, _error: &Error) -> bool { false }
}

impl<O: AnswerOracle> AnswerOracle for Retrying<O> {
  type Error = Error;

  async fn answer<'a>(&'a self, prompt: &'a str) -> Result<String> {
    let inner = &self.inner;
    self.attempt("answer", move || inner.answer(prompt), |e| inner.is_retryable(e)).await
  }

  fn is_retryable(&self, _error: &Error) -> bool { false }
}
