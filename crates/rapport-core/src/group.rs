//! Categorical grouping of contacts by a normalised attribute token.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  contact::{Contact, Field},
  merge::split_tokens,
};

/// Token assigned to contacts whose grouping attribute is empty.
pub const UNKNOWN: &str = "unknown";

/// A stored group row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
  pub token:       String,
  pub members:     Vec<String>,
  pub computed_at: DateTime<Utc>,
}

/// Token → member names, in contact order.
pub type Groups = BTreeMap<String, Vec<String>>;

/// Normalise a grouping token: trimmed and lowercased.
pub fn group_token(raw: &str) -> String { raw.trim().to_lowercase() }

/// Cluster contact names by every token of `field`.
///
/// A contact with an empty attribute lands under [`UNKNOWN`]. A name is
/// listed at most once per token.
pub fn build_groups(contacts: &[Contact], field: Field) -> Groups {
  let mut groups = Groups::new();

  for contact in contacts {
    let mut tokens: Vec<String> = split_tokens(contact.get(field)).map(group_token).collect();
    if tokens.is_empty() {
      tokens.push(UNKNOWN.to_owned());
    }

    for token in tokens {
      let members = groups.entry(token).or_default();
      if !members.contains(&contact.name) {
        members.push(contact.name.clone());
      }
    }
  }

  groups
}

/// Cluster contact names by the whole value of `field`, commas included.
///
/// Used for attributes such as `location`, where `"Austin, TX"` is one value.
pub fn build_value_groups(contacts: &[Contact], field: Field) -> Groups {
  let mut groups = Groups::new();
  for contact in contacts {
    let token = match group_token(contact.get(field)) {
      t if t.is_empty() => UNKNOWN.to_owned(),
      t => t,
    };
    let members = groups.entry(token).or_default();
    if !members.contains(&contact.name) {
      members.push(contact.name.clone());
    }
  }
  groups
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn multi_valued_attribute_joins_each_token() {
    let cs = vec![
      Contact::named("A").with(Field::CurrentCompany, "X, Y"),
      Contact::named("B").with(Field::CurrentCompany, "y"),
    ];
    let groups = build_groups(&cs, Field::CurrentCompany);

    assert_eq!(groups.len(), 2);
    assert_eq!(groups["y"], vec!["A", "B"]);
    assert_eq!(groups["x"], vec!["A"]);
  }

  #[test]
  fn empty_attribute_goes_to_unknown() {
    let cs = vec![
      Contact::named("A"),
      Contact::named("B").with(Field::College, " , "),
      Contact::named("C").with(Field::College, "MIT"),
    ];
    let groups = build_groups(&cs, Field::College);
    assert_eq!(groups[UNKNOWN], vec!["A", "B"]);
    assert_eq!(groups["mit"], vec!["C"]);
  }

  #[test]
  fn repeated_token_lists_member_once() {
    let cs = vec![Contact::named("A").with(Field::Industry, "Tech, tech , TECH")];
    let groups = build_groups(&cs, Field::Industry);
    assert_eq!(groups["tech"], vec!["A"]);
  }

  #[test]
  fn value_groups_keep_commas_and_ignore_case() {
    let cs = vec![
      Contact::named("A").with(Field::Location, "Austin, TX"),
      Contact::named("B").with(Field::Location, " austin, tx "),
      Contact::named("C").with(Field::Location, "Boston, MA"),
      Contact::named("D"),
    ];
    let groups = build_value_groups(&cs, Field::Location);
    assert_eq!(groups.len(), 3);
    assert_eq!(groups["austin, tx"], vec!["A", "B"]);
    assert_eq!(groups["boston, ma"], vec!["C"]);
    assert_eq!(groups[UNKNOWN], vec!["D"]);
  }

  #[test]
  fn regrouping_same_input_is_stable() {
    let cs = vec![
      Contact::named("A").with(Field::Industry, "Finance"),
      Contact::named("B").with(Field::Industry, "finance, Tech"),
    ];
    assert_eq!(build_groups(&cs, Field::Industry), build_groups(&cs, Field::Industry));
  }
}
