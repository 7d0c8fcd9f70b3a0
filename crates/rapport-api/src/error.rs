//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use rapport_core::contact::Field;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  /// A rejected submission. `field` names the offending field when known.
  #[error("bad request: {message}")]
  BadRequest { message: String, field: Option<Field> },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("oracle error: {0}")]
  Oracle(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub(crate) fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }

  pub(crate) fn oracle(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Oracle(Box::new(e))
  }
}

impl From<rapport_core::Error> for ApiError {
  fn from(e: rapport_core::Error) -> Self {
    Self::BadRequest { field: e.field(), message: e.to_string() }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "error": m })),
      ApiError::BadRequest { message, field: Some(f) } => {
        (StatusCode::BAD_REQUEST, json!({ "error": message, "field": f }))
      }
      ApiError::BadRequest { message, field: None } => {
        (StatusCode::BAD_REQUEST, json!({ "error": message }))
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": e.to_string() }))
      }
      ApiError::Oracle(e) => {
        tracing::error!(error = %e, "oracle failure");
        (StatusCode::BAD_GATEWAY, json!({ "error": e.to_string() }))
      }
    };
    (status, Json(body)).into_response()
  }
}
