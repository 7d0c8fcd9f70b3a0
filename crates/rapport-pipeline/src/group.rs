//! The grouping job for one dimension.

use rapport_core::{dimension::GroupDimension, group::build_groups, store::NetworkStore};
use serde::Serialize;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupingReport {
  pub dimension: GroupDimension,
  pub contacts:  usize,
  /// Tokens in the group table after the run.
  pub tokens:    usize,
}

/// Recompute every group of `dimension` from the current contact set and
/// replace the stored table with the result.
pub async fn run_grouping<S: NetworkStore>(
  store: &S,
  dimension: GroupDimension,
) -> Result<GroupingReport> {
  let contacts = store.list_contacts().await.map_err(Error::store)?;
  let groups = build_groups(&contacts, dimension.field());
  let tokens = store
    .replace_groups(dimension, &groups)
    .await
    .map_err(Error::store)?;

  tracing::info!(%dimension, contacts = contacts.len(), tokens, "grouping finished");
  Ok(GroupingReport { dimension, contacts: contacts.len(), tokens })
}
