//! Field-level merge policy for reconciling a submission with a stored record.
//!
//! Scalar fields are overwritten. Set fields are a union of comma-delimited
//! tokens, deduplicated case- and whitespace-insensitively, with the first
//! spelling seen kept (existing before incoming). The surviving spellings are
//! sorted by plain string order.

use std::collections::HashSet;

use strum::IntoEnumIterator as _;

use crate::contact::{Contact, Field, FieldKind};

/// Separator used when rejoining set-valued fields.
pub const SET_SEPARATOR: &str = ", ";

/// Split a comma-delimited value into trimmed, non-empty tokens.
pub fn split_tokens(value: &str) -> impl Iterator<Item = &str> {
  value.split(',').map(str::trim).filter(|t| !t.is_empty())
}

/// The comparison key for a set token: lowercased, inner whitespace collapsed.
pub fn token_key(token: &str) -> String {
  token
    .split_whitespace()
    .map(str::to_lowercase)
    .collect::<Vec<_>>()
    .join(" ")
}

/// Union two comma-delimited token sets.
pub fn merge_set(existing: &str, incoming: &str) -> String {
  let mut seen = HashSet::new();
  let mut tokens: Vec<&str> = split_tokens(existing)
    .chain(split_tokens(incoming))
    .filter(|t| seen.insert(token_key(t)))
    .collect();
  tokens.sort_unstable();
  tokens.join(SET_SEPARATOR)
}

/// Compute the next value of a single field.
pub fn merge_field(existing: &str, incoming: &str, kind: FieldKind) -> String {
  match kind {
    FieldKind::Scalar => incoming.to_owned(),
    FieldKind::Set => merge_set(existing, incoming),
  }
}

/// The result of merging a submission into a stored contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedContact {
  pub contact: Contact,
  /// Scalar fields whose non-empty value was overwritten with an empty one.
  pub cleared: Vec<Field>,
}

/// Merge every field of `incoming` into `existing` per its [`FieldKind`].
pub fn merge_contact(existing: &Contact, incoming: &Contact) -> MergedContact {
  let mut contact = Contact::default();
  let mut cleared = Vec::new();

  for field in Field::iter() {
    let old = existing.get(field);
    let new = incoming.get(field);
    if field.kind() == FieldKind::Scalar && new.is_empty() && !old.is_empty() {
      cleared.push(field);
    }
    *contact.get_mut(field) = merge_field(old, new, field.kind());
  }

  MergedContact { contact, cleared }
}
