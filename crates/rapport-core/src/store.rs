//! The `NetworkStore` trait and supporting result types.
//!
//! The trait is implemented by storage backends (e.g. `rapport-store-sqlite`).
//! The API and the batch jobs depend on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  contact::{Contact, Field},
  dimension::{ComparisonDimension, GroupDimension},
  graph::SimilarityEdge,
  group::{Group, Groups},
  parse::SharedValue,
};

// ─── Reconciliation ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
  Created,
  Updated,
}

/// What a reconciliation did to the stored record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reconciled {
  pub outcome: Outcome,
  /// The record as stored after the write.
  pub contact: Contact,
  /// Scalar fields whose previous value was overwritten with an empty one.
  pub cleared: Vec<Field>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a contact-network store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait NetworkStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Contacts ──────────────────────────────────────────────────────────

  /// Load every contact, in insertion order.
  fn list_contacts(
    &self,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  /// Look up a contact by exact name.
  fn get_contact<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + 'a;

  /// Create `incoming` verbatim if no contact has its name; otherwise merge
  /// it field by field into the existing record. Atomic.
  fn reconcile(
    &self,
    incoming: Contact,
  ) -> impl Future<Output = Result<Reconciled, Self::Error>> + Send + '_;

  /// Delete a contact and its attribute rows. Returns whether it existed.
  fn remove_contact<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Similarity edges ──────────────────────────────────────────────────

  /// Insert edges for `dimension`, ignoring pairs that already have one.
  /// Returns the number of newly inserted rows. Atomic.
  fn store_edges<'a>(
    &'a self,
    dimension: ComparisonDimension,
    triples: &'a [SharedValue],
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  fn list_edges(
    &self,
    dimension: ComparisonDimension,
  ) -> impl Future<Output = Result<Vec<SimilarityEdge>, Self::Error>> + Send + '_;

  // ── Groups ────────────────────────────────────────────────────────────

  /// Replace the whole group table for `dimension` with `groups`.
  /// Returns the number of tokens written. Atomic.
  fn replace_groups<'a>(
    &'a self,
    dimension: GroupDimension,
    groups: &'a Groups,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  fn list_groups(
    &self,
    dimension: GroupDimension,
  ) -> impl Future<Output = Result<Vec<Group>, Self::Error>> + Send + '_;
}
