//! [`SqliteStore`], the SQLite implementation of [`NetworkStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension as _};

use rapport_core::{
  contact::{Contact, Field},
  dimension::{ComparisonDimension, GroupDimension},
  graph::SimilarityEdge,
  group::{Group, Groups},
  merge::merge_contact,
  parse::SharedValue,
  store::{NetworkStore, Outcome, Reconciled},
};

use crate::{
  Result,
  encode::{RawEdge, RawGroup, contact_from_row, encode_dt, encode_members},
  schema::{SCHEMA, SELECT_CONTACT},
};

// ─── Attribute tables ────────────────────────────────────────────────────────

/// Each attribute table and the fields it holds, in column order.
const SATELLITES: [(&str, [Field; 3]); 3] = [
  ("relationships", [Field::RelationshipType, Field::Closeness, Field::Reliability]),
  ("background", [Field::Interests, Field::College, Field::HighSchool]),
  ("profile", [Field::CareerGoals, Field::Skills, Field::TalentRating]),
];

const EMPLOYMENT: [Field; 4] = [
  Field::CurrentCompany,
  Field::PreviousCompanies,
  Field::Industry,
  Field::JobTitle,
];

fn find_contact(conn: &Connection, name: &str) -> rusqlite::Result<Option<(i64, Contact)>> {
  conn
    .query_row(
      &format!("{SELECT_CONTACT} WHERE c.name = ?1"),
      rusqlite::params![name],
      contact_from_row,
    )
    .optional()
}

/// Upsert the four attribute rows for `contact_id`.
fn write_attributes(conn: &Connection, contact_id: i64, c: &Contact) -> rusqlite::Result<()> {
  let [cc, pc, ind, jt] = EMPLOYMENT.map(|f| c.get(f));
  conn.execute(
    "INSERT OR REPLACE INTO employment
       (contact_id, current_company, previous_companies, industry, job_title)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    rusqlite::params![contact_id, cc, pc, ind, jt],
  )?;

  for (table, fields) in SATELLITES {
    let [f1, f2, f3] = fields.map(|f| c.get(f));
    let columns = fields.map(Field::as_str).join(", ");
    conn.execute(
      &format!("INSERT OR REPLACE INTO {table} (contact_id, {columns}) VALUES (?1, ?2, ?3, ?4)"),
      rusqlite::params![contact_id, f1, f2, f3],
    )?;
  }
  Ok(())
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A contact network backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── NetworkStore impl ───────────────────────────────────────────────────────

impl NetworkStore for SqliteStore {
  type Error = crate::Error;

  // ── Contacts ──────────────────────────────────────────────────────────────

  async fn list_contacts(&self) -> Result<Vec<Contact>> {
    let contacts = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!("{SELECT_CONTACT} ORDER BY c.id"))?;
        let rows = stmt
          .query_map([], contact_from_row)?
          .map(|r| r.map(|(_, c)| c))
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(contacts)
  }

  async fn get_contact<'a>(&'a self, name: &'a str) -> Result<Option<Contact>> {
    let name = name.to_owned();
    let found = self
      .conn
      .call(move |conn| Ok(find_contact(conn, &name)?))
      .await?;
    Ok(found.map(|(_, c)| c))
  }

  async fn reconcile(&self, incoming: Contact) -> Result<Reconciled> {
    let reconciled = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let reconciled = match find_contact(&tx, &incoming.name)? {
          Some((id, existing)) => {
            let merged = merge_contact(&existing, &incoming);
            let c = &merged.contact;
            tx.execute(
              "UPDATE contacts SET email = ?1, phone = ?2, location = ?3 WHERE id = ?4",
              rusqlite::params![c.email, c.phone, c.location, id],
            )?;
            write_attributes(&tx, id, c)?;
            Reconciled {
              outcome: Outcome::Updated,
              contact: merged.contact,
              cleared: merged.cleared,
            }
          }
          None => {
            tx.execute(
              "INSERT INTO contacts (name, email, phone, location) VALUES (?1, ?2, ?3, ?4)",
              rusqlite::params![
                incoming.name,
                incoming.email,
                incoming.phone,
                incoming.location
              ],
            )?;
            let id = tx.last_insert_rowid();
            write_attributes(&tx, id, &incoming)?;
            Reconciled { outcome: Outcome::Created, contact: incoming, cleared: vec![] }
          }
        };

        tx.commit()?;
        Ok(reconciled)
      })
      .await?;
    Ok(reconciled)
  }

  async fn remove_contact<'a>(&'a self, name: &'a str) -> Result<bool> {
    let name = name.to_owned();
    let removed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let id: Option<i64> = tx
          .query_row("SELECT id FROM contacts WHERE name = ?1", rusqlite::params![name], |r| {
            r.get(0)
          })
          .optional()?;

        let Some(id) = id else {
          return Ok(false);
        };

        for table in ["employment", "relationships", "background", "profile"] {
          tx.execute(
            &format!("DELETE FROM {table} WHERE contact_id = ?1"),
            rusqlite::params![id],
          )?;
        }
        tx.execute("DELETE FROM contacts WHERE id = ?1", rusqlite::params![id])?;
        tx.commit()?;
        Ok(true)
      })
      .await?;
    Ok(removed)
  }

  // ── Similarity edges ──────────────────────────────────────────────────────

  async fn store_edges<'a>(
    &'a self,
    dimension: ComparisonDimension,
    triples:   &'a [SharedValue],
  ) -> Result<usize> {
    if triples.is_empty() {
      return Ok(0);
    }

    let table       = dimension.table();
    let triples     = triples.to_vec();
    let recorded_at = encode_dt(Utc::now());

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut inserted = 0;
        {
          let mut stmt = tx.prepare(&format!(
            "INSERT OR IGNORE INTO {table} (person1, person2, shared_value, recorded_at)
             VALUES (?1, ?2, ?3, ?4)"
          ))?;
          for t in &triples {
            inserted += stmt.execute(rusqlite::params![
              t.person_a,
              t.person_b,
              t.value,
              recorded_at
            ])?;
          }
        }
        tx.commit()?;
        Ok(inserted)
      })
      .await?;
    Ok(inserted)
  }

  async fn list_edges(&self, dimension: ComparisonDimension) -> Result<Vec<SimilarityEdge>> {
    let table = dimension.table();

    let raws: Vec<RawEdge> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT id, person1, person2, shared_value, recorded_at FROM {table} ORDER BY id"
        ))?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawEdge {
              id:           row.get(0)?,
              person1:      row.get(1)?,
              person2:      row.get(2)?,
              shared_value: row.get(3)?,
              recorded_at:  row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEdge::into_edge).collect()
  }

  // ── Groups ────────────────────────────────────────────────────────────────

  async fn replace_groups<'a>(
    &'a self,
    dimension: GroupDimension,
    groups:    &'a Groups,
  ) -> Result<usize> {
    let table       = dimension.table();
    let computed_at = encode_dt(Utc::now());
    let rows: Vec<(String, String)> = groups
      .iter()
      .map(|(token, members)| Ok((token.clone(), encode_members(members)?)))
      .collect::<Result<_>>()?;

    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(&format!("DELETE FROM {table}"), [])?;
        {
          let mut stmt = tx.prepare(&format!(
            "INSERT INTO {table} (token, members, computed_at) VALUES (?1, ?2, ?3)"
          ))?;
          for (token, members) in &rows {
            stmt.execute(rusqlite::params![token, members, computed_at])?;
          }
        }
        tx.commit()?;
        Ok(rows.len())
      })
      .await?;
    Ok(written)
  }

  async fn list_groups(&self, dimension: GroupDimension) -> Result<Vec<Group>> {
    let table = dimension.table();

    let raws: Vec<RawGroup> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT token, members, computed_at FROM {table} ORDER BY token"
        ))?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawGroup {
              token:       row.get(0)?,
              members:     row.get(1)?,
              computed_at: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawGroup::into_group).collect()
  }
}
