//! Batch jobs against an in-memory store and a scripted oracle.

use std::{collections::VecDeque, sync::Mutex};

use rapport_core::{
  contact::{Contact, Field},
  dimension::{ComparisonDimension, GroupDimension},
  oracle::{ComparisonOracle, ComparisonRequest},
  store::NetworkStore,
};
use rapport_store_sqlite::SqliteStore;

use crate::{Error, PipelineConfig, run_comparison, run_grouping};

#[derive(Debug, thiserror::Error)]
#[error("scripted failure")]
struct ScriptedFailure;

/// Answers each call with the next scripted reply and records every request.
#[derive(Default)]
struct Scripted {
  replies:  Mutex<VecDeque<Result<String, ScriptedFailure>>>,
  requests: Mutex<Vec<ComparisonRequest>>,
}

impl Scripted {
  fn new(replies: impl IntoIterator<Item = Result<&'static str, ScriptedFailure>>) -> Self {
    Self {
      replies:  Mutex::new(replies.into_iter().map(|r| r.map(str::to_owned)).collect()),
      requests: Mutex::default(),
    }
  }

  fn calls(&self) -> usize { self.requests.lock().unwrap().len() }
}

impl ComparisonOracle for Scripted {
  type Error = ScriptedFailure;

  async fn compare<'a>(
    &'a self,
    request: &'a ComparisonRequest,
  ) -> Result<String, ScriptedFailure> {
    self.requests.lock().unwrap().push(request.clone());
    self
      .replies
      .lock()
      .unwrap()
      .pop_front()
      .unwrap_or_else(|| Ok(String::new()))
  }
}

async fn store_with(contacts: Vec<Contact>) -> SqliteStore {
  let s = SqliteStore::open_in_memory().await.expect("in-memory store");
  for c in contacts {
    s.reconcile(c).await.unwrap();
  }
  s
}

fn interests(name: &str, value: &str) -> Contact {
  Contact::named(name).with(Field::Interests, value)
}

fn config(chunk_size: usize) -> PipelineConfig { PipelineConfig { chunk_size } }

// ─── Comparison ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn alice_and_bob_share_math() {
  let s = store_with(vec![
    interests("Alice", "chess, math"),
    interests("Bob", "Math, painting"),
  ])
  .await;
  let oracle = Scripted::new([Ok(r#"["Alice","Bob","math"]"#)]);

  let report = run_comparison(&s, &oracle, ComparisonDimension::Interests, &config(50))
    .await
    .unwrap();

  assert_eq!(report.pairs, 1);
  assert_eq!(report.inserted, 1);
  let edges = s.list_edges(ComparisonDimension::Interests).await.unwrap();
  assert_eq!(edges.len(), 1);
  assert_eq!(
    (edges[0].person1.as_str(), edges[0].person2.as_str(), edges[0].shared_value.as_str()),
    ("Alice", "Bob", "math"),
  );
}

#[tokio::test]
async fn rerun_is_idempotent() {
  let s = store_with(vec![interests("Alice", "chess"), interests("Bob", "chess")]).await;
  let oracle = Scripted::new([
    Ok(r#"["Alice","Bob","chess"]"#),
    Ok(r#"["Bob","Alice","board games"]"#),
  ]);

  let d = ComparisonDimension::Interests;
  let first = run_comparison(&s, &oracle, d, &config(50)).await.unwrap();
  let second = run_comparison(&s, &oracle, d, &config(50)).await.unwrap();

  assert_eq!(first.inserted, 1);
  assert_eq!(second.inserted, 0);
  let edges = s.list_edges(d).await.unwrap();
  assert_eq!(edges.len(), 1);
  assert_eq!(edges[0].shared_value, "chess");
}

#[tokio::test]
async fn no_eligible_pairs_makes_no_call() {
  let s = store_with(vec![interests("Alice", "chess"), Contact::named("Bob")]).await;
  let oracle = Scripted::default();

  let report = run_comparison(&s, &oracle, ComparisonDimension::Interests, &config(50))
    .await
    .unwrap();

  assert_eq!(report.pairs, 0);
  assert_eq!(report.chunks, 0);
  assert_eq!(oracle.calls(), 0);
}

#[tokio::test]
async fn pairs_are_split_into_chunks() {
  let s = store_with(vec![
    interests("Alice", "chess"),
    interests("Bob", "go"),
    interests("Cy", "go"),
  ])
  .await;
  let oracle = Scripted::new([Ok(""), Ok(r#"["Bob","Cy","go"]"#)]);

  let report = run_comparison(&s, &oracle, ComparisonDimension::Interests, &config(2))
    .await
    .unwrap();

  assert_eq!(report.pairs, 3);
  assert_eq!(report.chunks, 2);
  let requests = oracle.requests.lock().unwrap();
  assert_eq!(requests[0].pairs.len(), 2);
  assert_eq!(requests[1].pairs.len(), 1);
  assert!(requests[1].requested("Bob", "Cy"));
}

#[tokio::test]
async fn failed_chunk_does_not_stop_the_others() {
  let s = store_with(vec![
    interests("Alice", "chess"),
    interests("Bob", "go"),
    interests("Cy", "go"),
  ])
  .await;
  let oracle = Scripted::new([Err(ScriptedFailure), Ok(r#"["Bob","Cy","go"]"#)]);

  let report = run_comparison(&s, &oracle, ComparisonDimension::Interests, &config(2))
    .await
    .unwrap();

  assert_eq!(report.failed_chunks, 1);
  assert_eq!(report.inserted, 1);
  assert_eq!(s.list_edges(ComparisonDimension::Interests).await.unwrap().len(), 1);
}

#[tokio::test]
async fn every_chunk_failing_is_oracle_unavailable() {
  let s = store_with(vec![interests("Alice", "chess"), interests("Bob", "go")]).await;
  let oracle = Scripted::new([Err(ScriptedFailure)]);

  let err = run_comparison(&s, &oracle, ComparisonDimension::Interests, &config(50))
    .await
    .unwrap_err();

  assert!(matches!(err, Error::OracleUnavailable {
    dimension: ComparisonDimension::Interests,
    chunks:    1,
  }));
  assert!(s.list_edges(ComparisonDimension::Interests).await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_answer_is_success_with_no_edges() {
  let s = store_with(vec![interests("Alice", "chess"), interests("Bob", "go")]).await;
  let oracle = Scripted::new([Ok("")]);

  let report = run_comparison(&s, &oracle, ComparisonDimension::Interests, &config(50))
    .await
    .unwrap();

  assert_eq!(report.failed_chunks, 0);
  assert_eq!(report.inserted, 0);
}

#[tokio::test]
async fn malformed_and_unrequested_lines_are_dropped() {
  let s = store_with(vec![interests("Alice", "chess"), interests("Bob", "chess")]).await;
  let oracle = Scripted::new([Ok(concat!(
    "Here you go:\n",
    "[\"Alice\", \"Bob\"]\n",
    "[\"Alice\", \"Zed\", \"chess\"]\n",
    "[\"Bob\", \"Alice\", \"chess\"]\n",
  ))]);

  let report = run_comparison(&s, &oracle, ComparisonDimension::Interests, &config(50))
    .await
    .unwrap();

  assert_eq!(report.skipped_lines, 2);
  assert_eq!(report.unrequested, 1);
  assert_eq!(report.inserted, 1);
  let edges = s.list_edges(ComparisonDimension::Interests).await.unwrap();
  assert_eq!(edges[0].person1, "Bob");
  assert_eq!(edges[0].person2, "Alice");
}

#[tokio::test]
async fn goals_compare_career_goals() {
  let s = store_with(vec![
    Contact::named("Alice").with(Field::CareerGoals, "found a startup"),
    Contact::named("Bob").with(Field::CareerGoals, "start a company"),
    interests("Cy", "chess"),
  ])
  .await;
  let oracle = Scripted::new([Ok(r#"["Alice","Bob","entrepreneurship"]"#)]);

  let report = run_comparison(&s, &oracle, ComparisonDimension::Goals, &config(50))
    .await
    .unwrap();

  assert_eq!(report.pairs, 1);
  assert_eq!(s.list_edges(ComparisonDimension::Goals).await.unwrap().len(), 1);
  assert!(s.list_edges(ComparisonDimension::Interests).await.unwrap().is_empty());
}

#[tokio::test]
async fn zero_chunk_size_is_rejected() {
  let s = store_with(vec![]).await;
  let err = run_comparison(&s, &Scripted::default(), ComparisonDimension::Skills, &config(0))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidChunkSize));
}

// ─── Grouping ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn grouping_by_company() {
  let s = store_with(vec![
    Contact::named("A").with(Field::CurrentCompany, "X, Y"),
    Contact::named("B").with(Field::CurrentCompany, "y"),
    Contact::named("C"),
  ])
  .await;

  let report = run_grouping(&s, GroupDimension::Company).await.unwrap();
  assert_eq!(report.contacts, 3);
  assert_eq!(report.tokens, 3);

  let groups = s.list_groups(GroupDimension::Company).await.unwrap();
  let pairs: Vec<(&str, Vec<&str>)> = groups
    .iter()
    .map(|g| (g.token.as_str(), g.members.iter().map(String::as_str).collect()))
    .collect();
  assert_eq!(pairs, vec![
    ("unknown", vec!["C"]),
    ("x", vec!["A"]),
    ("y", vec!["A", "B"]),
  ]);
}

#[tokio::test]
async fn regrouping_follows_contact_changes() {
  let s = store_with(vec![Contact::named("A").with(Field::College, "MIT")]).await;
  run_grouping(&s, GroupDimension::College).await.unwrap();

  s.reconcile(Contact::named("A").with(Field::College, "Stanford")).await.unwrap();
  s.reconcile(Contact::named("B").with(Field::College, "stanford ")).await.unwrap();
  run_grouping(&s, GroupDimension::College).await.unwrap();

  let groups = s.list_groups(GroupDimension::College).await.unwrap();
  assert_eq!(groups.len(), 1);
  assert_eq!(groups[0].token, "stanford");
  assert_eq!(groups[0].members, vec!["A", "B"]);
}
