//! Offline batch jobs over the contact network.
//!
//! [`run_comparison`] drives one comparison dimension through
//! enumerate → chunk → oracle → parse → store. [`run_grouping`] recomputes one
//! grouping dimension from the current contact set. Both take the store and
//! the oracle as parameters; neither owns them.

mod compare;
mod group;

pub mod error;

#[cfg(test)]
mod tests;

use serde::Deserialize;

pub use compare::{ComparisonReport, run_comparison};
pub use error::{Error, Result};
pub use group::{GroupingReport, run_grouping};

/// Tuning for the comparison job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
  /// Pairs per oracle request. Must be at least 1.
  pub chunk_size: usize,
}

impl Default for PipelineConfig {
  fn default() -> Self { Self { chunk_size: 50 } }
}
