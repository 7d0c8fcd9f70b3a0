//! The comparison oracle: request construction and the transport trait.
//!
//! A [`ComparisonRequest`] packs a batch of pairs for one dimension into a
//! single natural-language instruction. Transports (e.g. `rapport-oracle`)
//! implement [`ComparisonOracle`] and return the oracle's raw text.

use std::future::Future;

use crate::{Result, dimension::ComparisonDimension, pairs::ComparisonPair};

/// System message sent alongside every comparison prompt.
pub const SYSTEM_PROMPT: &str =
  "You compare people's attributes and answer only with JSON-style arrays, one per line.";

/// A batch of pairs ready to be sent to the oracle.
#[derive(Debug, Clone)]
pub struct ComparisonRequest {
  pub dimension: ComparisonDimension,
  pub pairs:     Vec<ComparisonPair>,
  /// The user-message body, including every pair literal.
  pub prompt:    String,
}

impl ComparisonRequest {
  pub fn new(dimension: ComparisonDimension, pairs: Vec<ComparisonPair>) -> Result<Self> {
    let prompt = build_prompt(dimension, &pairs)?;
    Ok(Self { dimension, pairs, prompt })
  }

  /// True if `a` and `b` were asked about in this batch.
  pub fn requested(&self, a: &str, b: &str) -> bool {
    self.pairs.iter().any(|p| p.joins(a, b))
  }
}

/// Serialise one pair as the literal `["nameA", "valueA", "nameB", "valueB"]`.
pub fn pair_literal(pair: &ComparisonPair) -> Result<String> {
  Ok(serde_json::to_string(&[
    &pair.name_a,
    &pair.value_a,
    &pair.name_b,
    &pair.value_b,
  ])?)
}

fn build_prompt(dimension: ComparisonDimension, pairs: &[ComparisonPair]) -> Result<String> {
  let noun = dimension.noun();
  let (hint_a, hint_b) = dimension.similarity_hint();

  let literals = pairs
    .iter()
    .map(pair_literal)
    .collect::<Result<Vec<_>>>()?
    .join("\n");

  Ok(format!(
    "You will receive a list of entries. Each entry is an array in this format:\n\
     [person1 name, person1 {noun}, person2 name, person2 {noun}]\n\n\
     {literals}\n\n\
     For each entry, decide whether person1 and person2 share any of their {noun}. \
     Compare meaning, not spelling: ignore case, and treat different wordings of the \
     same general idea as shared (e.g. \"{hint_a}\" vs. \"{hint_b}\").\n\
     For each entry that shares something, output exactly one line:\n\
     [\"person1 name\", \"person2 name\", \"shared {noun}\"]\n\
     Use the names exactly as given. Output nothing for entries with nothing in common.\n\
     Output only these arrays, one per line: no explanations, no numbering, no markdown."
  ))
}

/// A transport that can answer a [`ComparisonRequest`] with raw text.
///
/// Implementations must return `Err` for any failure to obtain an answer;
/// `Ok` with empty text means the oracle found nothing in common.
pub trait ComparisonOracle: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn compare<'a>(
    &'a self,
    request: &'a ComparisonRequest,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;

  /// Whether a failed call is worth repeating. Defaults to `true`.
  fn is_retryable(&self, _error: &Self::Error) -> bool { true }
}
