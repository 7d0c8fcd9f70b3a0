//! Error type for `rapport-oracle`.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("oracle request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("oracle returned {status}: {body}")]
  Status { status: reqwest::StatusCode, body: String },

  #[error("oracle response carried no completion")]
  EmptyCompletion,

  #[error("oracle did not answer within {0:?}")]
  Timeout(Duration),

  #[error("oracle unavailable after {attempts} attempt(s): {last}")]
  Unavailable {
    attempts: u32,
    #[source]
    last:     Box<dyn std::error::Error + Send + Sync>,
  },
}

impl Error {
  /// Transport failures, timeouts, throttling, server errors and empty
  /// completions are worth another attempt. Other client errors are not.
  pub fn is_transient(&self) -> bool {
    match self {
      Self::Request(_) | Self::Timeout(_) | Self::EmptyCompletion => true,
      Self::Status { status, .. } => {
        status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
      }
      Self::Unavailable { .. } => false,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
