//! Handlers for `/contacts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/contacts` | Insertion order |
//! | `POST`   | `/contacts` | Reconcile. Every field required; 201 if created, 200 if merged |
//! | `GET`    | `/contacts/{name}` | 404 if not found |
//! | `DELETE` | `/contacts/{name}` | 204, or 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use rapport_core::{
  contact::{Contact, ContactSubmission},
  store::{NetworkStore, Outcome},
};

use crate::error::ApiError;

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /contacts`
pub async fn list<S: NetworkStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Contact>>, ApiError> {
  let contacts = store.list_contacts().await.map_err(ApiError::store)?;
  Ok(Json(contacts))
}

// ─── Reconcile ───────────────────────────────────────────────────────────────

/// `POST /contacts`, body: every contact field as a string.
///
/// Malformed JSON and wrong-typed fields are 400s with a JSON body, never
/// axum's plain-text rejection.
pub async fn reconcile<S: NetworkStore>(
  State(store): State<Arc<S>>,
  body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(body) =
    body.map_err(|e| ApiError::BadRequest { message: e.body_text(), field: None })?;
  let incoming = ContactSubmission::from_json(body)?.into_contact()?;
  let reconciled = store.reconcile(incoming).await.map_err(ApiError::store)?;

  for field in &reconciled.cleared {
    tracing::warn!(
      name = %reconciled.contact.name,
      %field,
      "submission cleared a populated field",
    );
  }

  let status = match reconciled.outcome {
    Outcome::Created => StatusCode::CREATED,
    Outcome::Updated => StatusCode::OK,
  };
  Ok((status, Json(reconciled)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /contacts/{name}`
pub async fn get_one<S: NetworkStore>(
  State(store): State<Arc<S>>,
  Path(name): Path<String>,
) -> Result<Json<Contact>, ApiError> {
  let contact = store
    .get_contact(&name)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("contact {name:?} not found")))?;
  Ok(Json(contact))
}

// ─── Remove ──────────────────────────────────────────────────────────────────

/// `DELETE /contacts/{name}`
pub async fn remove<S: NetworkStore>(
  State(store): State<Arc<S>>,
  Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
  if store.remove_contact(&name).await.map_err(ApiError::store)? {
    tracing::info!(%name, "contact removed");
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("contact {name:?} not found")))
  }
}
