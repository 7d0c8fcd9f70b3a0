//! Error type for `rapport-pipeline`.

use rapport_core::dimension::ComparisonDimension;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("oracle unavailable for {dimension}: all {chunks} chunk(s) failed")]
  OracleUnavailable { dimension: ComparisonDimension, chunks: usize },

  #[error("chunk size must be at least 1")]
  InvalidChunkSize,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error(transparent)]
  Core(#[from] rapport_core::Error),
}

impl Error {
  pub(crate) fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
