//! Handler for `POST /ask`: a free-form question about the whole network.

use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use rapport_core::{
  ask::{AnswerOracle, build_ask_prompt},
  store::NetworkStore,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Store and oracle for the ask route.
pub struct AskState<S, O> {
  pub store:  Arc<S>,
  pub oracle: Arc<O>,
}

impl<S, O> Clone for AskState<S, O> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), oracle: self.oracle.clone() }
  }
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
  pub question: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
  pub answer: String,
}

/// `POST /ask`, body `{"question": "..."}`.
pub async fn ask<S: NetworkStore, O: AnswerOracle>(
  State(state): State<AskState<S, O>>,
  body: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
  let Json(body) =
    body.map_err(|e| ApiError::BadRequest { message: e.body_text(), field: None })?;

  let contacts = state.store.list_contacts().await.map_err(ApiError::store)?;
  let prompt = build_ask_prompt(&contacts, &body.question)?;
  tracing::info!(contacts = contacts.len(), "answering question");

  let answer = state.oracle.answer(&prompt).await.map_err(ApiError::oracle)?;
  Ok(Json(AskResponse { answer }))
}
