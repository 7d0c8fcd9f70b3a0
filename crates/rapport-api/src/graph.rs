//! Handlers for `/graph` endpoints.
//!
//! `GET /graph` lists every contact as a node. `GET /graph/{dimension}` adds
//! the stored edges or groups of one dimension, or draws a view dimension
//! (`location`, `talent_rating`, `closeness`) from the contacts themselves.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use rapport_core::{dimension::Dimension, graph::Graph, store::NetworkStore};

use crate::error::ApiError;

/// `GET /graph`
pub async fn all<S: NetworkStore>(State(store): State<Arc<S>>) -> Result<Json<Graph>, ApiError> {
  let contacts = store.list_contacts().await.map_err(ApiError::store)?;
  Ok(Json(Graph::from_names(contacts.iter().map(|c| c.name.as_str()))))
}

/// `GET /graph/{dimension}`
pub async fn by_dimension<S: NetworkStore>(
  State(store): State<Arc<S>>,
  Path(dimension): Path<String>,
) -> Result<Json<Graph>, ApiError> {
  let dimension: Dimension = dimension
    .parse()
    .map_err(|e: rapport_core::Error| ApiError::NotFound(e.to_string()))?;

  let graph = match dimension {
    Dimension::Comparison(d) => {
      Graph::from_edges(&store.list_edges(d).await.map_err(ApiError::store)?)
    }
    Dimension::Grouping(d) => {
      Graph::from_groups(&store.list_groups(d).await.map_err(ApiError::store)?)
    }
    Dimension::View(v) => {
      Graph::for_view(v, &store.list_contacts().await.map_err(ApiError::store)?)
    }
  };
  Ok(Json(graph))
}
