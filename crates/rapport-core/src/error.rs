//! Error types for `rapport-core`.

use thiserror::Error;

use crate::contact::Field;

#[derive(Debug, Error)]
pub enum Error {
  /// A reconciliation request left out a field entirely.
  #[error("missing field: {0}")]
  MergeFieldMissing(Field),

  #[error("invalid field {field}: {reason}")]
  InvalidField { field: Field, reason: String },

  #[error("question must not be blank")]
  BlankQuestion,

  #[error("unknown dimension: {0:?}")]
  UnknownDimension(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  /// The field a validation error refers to, if any.
  pub fn field(&self) -> Option<Field> {
    match self {
      Self::MergeFieldMissing(f) | Self::InvalidField { field: f, .. } => Some(*f),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
