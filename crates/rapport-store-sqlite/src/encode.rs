//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. Group member lists are stored as
//! compact JSON arrays so names containing commas survive.

use chrono::{DateTime, Utc};
use rapport_core::{
  contact::{Contact, Field},
  graph::SimilarityEdge,
  group::Group,
};
use strum::IntoEnumIterator as _;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Members ─────────────────────────────────────────────────────────────────

pub fn encode_members(members: &[String]) -> Result<String> {
  Ok(serde_json::to_string(members)?)
}

pub fn decode_members(s: &str) -> Result<Vec<String>> { Ok(serde_json::from_str(s)?) }

// ─── Contact rows ────────────────────────────────────────────────────────────

/// Read a row produced by [`crate::schema::SELECT_CONTACT`].
///
/// Returns the row id alongside the contact.
pub fn contact_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(i64, Contact)> {
  let id: i64 = row.get(0)?;
  let mut contact = Contact::default();
  for (offset, field) in Field::iter().enumerate() {
    *contact.get_mut(field) = row.get(offset + 1)?;
  }
  Ok((id, contact))
}

// ─── Raw row types ───────────────────────────────────────────────────────────

/// An edge row as read from SQLite, before timestamp decoding.
pub struct RawEdge {
  pub id:           i64,
  pub person1:      String,
  pub person2:      String,
  pub shared_value: String,
  pub recorded_at:  String,
}

impl RawEdge {
  pub fn into_edge(self) -> Result<SimilarityEdge> {
    Ok(SimilarityEdge {
      id:           self.id,
      person1:      self.person1,
      person2:      self.person2,
      shared_value: self.shared_value,
      recorded_at:  decode_dt(&self.recorded_at)?,
    })
  }
}

/// A group row as read from SQLite.
pub struct RawGroup {
  pub token:       String,
  pub members:     String,
  pub computed_at: String,
}

impl RawGroup {
  pub fn into_group(self) -> Result<Group> {
    Ok(Group {
      token:       self.token,
      members:     decode_members(&self.members)?,
      computed_at: decode_dt(&self.computed_at)?,
    })
  }
}
