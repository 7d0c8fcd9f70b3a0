//! Pipe-delimited contact import: one contact per line, seventeen fields in
//! schema order.

use strum::IntoEnumIterator as _;

use crate::contact::{Contact, Field};

/// A line that could not be read as a contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
  /// 1-based.
  pub line_no: usize,
  pub fields:  usize,
}

#[derive(Debug, Clone, Default)]
pub struct ImportBatch {
  pub contacts: Vec<Contact>,
  pub rejected: Vec<RejectedLine>,
}

/// Parse a single line. Returns `None` if it has fewer than 17 fields or a
/// blank name. Extra trailing fields are ignored.
pub fn parse_contact_line(line: &str) -> Option<Contact> {
  let parts: Vec<&str> = line.split('|').map(str::trim).collect();
  if parts.len() < Field::iter().count() || parts[0].is_empty() {
    return None;
  }

  let mut contact = Contact::default();
  for (field, value) in Field::iter().zip(parts) {
    *contact.get_mut(field) = value.to_owned();
  }
  Some(contact)
}

/// Parse a whole file body. Blank lines are skipped silently.
pub fn parse_contacts(body: &str) -> ImportBatch {
  let mut batch = ImportBatch::default();
  for (idx, line) in body.lines().enumerate() {
    if line.trim().is_empty() {
      continue;
    }
    match parse_contact_line(line) {
      Some(c) => batch.contacts.push(c),
      None => batch.rejected.push(RejectedLine {
        line_no: idx + 1,
        fields:  line.split('|').count(),
      }),
    }
  }
  batch
}
