//! Unordered pair enumeration over the contact set.

use serde::{Deserialize, Serialize};

use crate::contact::{Contact, Field};

/// Two contacts and their values along one attribute, as sent to the oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonPair {
  pub name_a:  String,
  pub value_a: String,
  pub name_b:  String,
  pub value_b: String,
}

impl ComparisonPair {
  /// True if this pair joins `x` and `y`, in either order.
  pub fn joins(&self, x: &str, y: &str) -> bool {
    (self.name_a == x && self.name_b == y) || (self.name_a == y && self.name_b == x)
  }
}

/// Every unordered pair `{i, j}`, `i < j`, whose selected attribute is
/// non-blank on both sides.
///
/// Pairs whose names coincide are skipped as well, so a self-pair can never
/// reach the oracle even if the input holds duplicate names.
pub fn enumerate_pairs(
  contacts: &[Contact],
  field: Field,
) -> impl Iterator<Item = ComparisonPair> + '_ {
  let eligible: Vec<&Contact> = contacts
    .iter()
    .filter(|c| !c.get(field).trim().is_empty())
    .collect();

  (0..eligible.len()).flat_map(move |i| {
    let a = eligible[i];
    eligible[i + 1..]
      .iter()
      .filter(move |b| b.name != a.name)
      .map(move |b| ComparisonPair {
        name_a:  a.name.clone(),
        value_a: a.get(field).trim().to_owned(),
        name_b:  b.name.clone(),
        value_b: b.get(field).trim().to_owned(),
      })
      .collect::<Vec<_>>()
  })
}
