//! JSON REST API for the rapport contact network.
//!
//! Exposes an axum [`Router`] backed by any [`rapport_core::store::NetworkStore`]
//! and, for `/ask`, any [`rapport_core::ask::AnswerOracle`]. Batch jobs are
//! not exposed here; they run from the command line.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", rapport_api::api_router(store.clone(), oracle.clone()))
//! ```

pub mod ask;
pub mod contacts;
pub mod error;
pub mod graph;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use rapport_core::{ask::AnswerOracle, store::NetworkStore};

pub use error::ApiError;

/// Build a fully-materialised API router for `store` and `oracle`.
pub fn api_router<S, O>(store: Arc<S>, oracle: Arc<O>) -> Router<()>
where
  S: NetworkStore + 'static,
  O: AnswerOracle + 'static,
{
  let ask = Router::new()
    .route("/ask", post(ask::ask::<S, O>))
    .with_state(ask::AskState { store: store.clone(), oracle });

  Router::new()
    // Contacts
    .route("/contacts", get(contacts::list::<S>).post(contacts::reconcile::<S>))
    .route("/contacts/{name}", get(contacts::get_one::<S>).delete(contacts::remove::<S>))
    // Graph
    .route("/graph", get(graph::all::<S>))
    .route("/graph/{dimension}", get(graph::by_dimension::<S>))
    .with_state(store)
    .merge(ask)
}

#[cfg(test)]
mod tests {
  use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
  };
  use std::sync::Mutex;

  use rapport_core::{
    contact::{Contact, ContactSubmission, Field},
    dimension::ComparisonDimension,
    parse::SharedValue,
  };
  use rapport_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::*;

  #[derive(Debug, thiserror::Error)]
  #[error("oracle offline")]
  struct Offline;

  /// Answers every prompt with `reply`, or fails when there is none.
  #[derive(Default)]
  struct Canned {
    reply:   Option<String>,
    prompts: Mutex<Vec<String>>,
  }

  impl Canned {
    fn replying(reply: &str) -> Self { Self { reply: Some(reply.into()), ..Self::default() } }
  }

  impl AnswerOracle for Canned {
    type Error = Offline;

    async fn answer<'a>(&'a self, prompt: &'a str) -> Result<String, Offline> {
      self.prompts.lock().unwrap().push(prompt.to_owned());
      self.reply.clone().ok_or(Offline)
    }
  }

  async fn make_store() -> Arc<SqliteStore> {
    Arc::new(SqliteStore::open_in_memory().await.unwrap())
  }

  fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    builder.body(body).unwrap()
  }

  async fn send(
    store: Arc<SqliteStore>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let app = api_router(store, Arc::new(Canned::default()));
    call(app, request(method, uri, body)).await
  }

  async fn call(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, json)
  }

  fn submission(c: Contact) -> Value { serde_json::to_value(ContactSubmission::from(c)).unwrap() }

  // ── Reconcile ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn post_creates_then_merges() {
    let store = make_store().await;

    let sam = Contact::named("Sam").with(Field::PreviousCompanies, "Acme");
    let (status, body) = send(store.clone(), "POST", "/contacts", Some(submission(sam))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["outcome"], "created");

    let update = Contact::named("Sam").with(Field::PreviousCompanies, "acme, Globex");
    let (status, body) = send(store.clone(), "POST", "/contacts", Some(submission(update))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "updated");
    assert_eq!(body["contact"]["previous_companies"], "Acme, Globex");
  }

  #[tokio::test]
  async fn post_reports_cleared_fields() {
    let store = make_store().await;
    let first = Contact::named("Sam").with(Field::Phone, "555-0100");
    send(store.clone(), "POST", "/contacts", Some(submission(first))).await;

    let (status, body) =
      send(store, "POST", "/contacts", Some(submission(Contact::named("Sam")))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cleared"], json!(["phone"]));
    assert_eq!(body["contact"]["phone"], "");
  }

  #[tokio::test]
  async fn post_missing_field_is_400_naming_the_field() {
    let store = make_store().await;
    let mut body = submission(Contact::named("Sam"));
    body.as_object_mut().unwrap().remove("skills");

    let (status, resp) = send(store.clone(), "POST", "/contacts", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["field"], "skills");
    assert!(resp["error"].as_str().unwrap().contains("skills"));

    // Nothing was written.
    let (_, list) = send(store, "GET", "/contacts", None).await;
    assert_eq!(list, json!([]));
  }

  #[tokio::test]
  async fn post_wrong_typed_field_is_400_naming_the_field() {
    let store = make_store().await;
    let mut body = submission(Contact::named("Sam"));
    body["email"] = json!(5);

    let (status, resp) = send(store.clone(), "POST", "/contacts", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["field"], "email");
    assert!(resp["error"].as_str().unwrap().contains("email"));

    let (_, list) = send(store, "GET", "/contacts", None).await;
    assert_eq!(list, json!([]));
  }

  #[tokio::test]
  async fn post_malformed_json_is_400_with_json_body() {
    let store = make_store().await;
    let req = Request::builder()
      .method("POST")
      .uri("/contacts")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from("{\"name\": "))
      .unwrap();

    let (status, resp) = call(api_router(store, Arc::new(Canned::default())), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(resp["error"].is_string());
    assert!(resp.get("field").is_none());
  }

  #[tokio::test]
  async fn post_blank_name_is_400() {
    let store = make_store().await;
    let (status, resp) =
      send(store, "POST", "/contacts", Some(submission(Contact::named("   ")))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["field"], "name");
  }

  // ── Get / delete ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_and_delete_by_name() {
    let store = make_store().await;
    send(store.clone(), "POST", "/contacts", Some(submission(Contact::named("Ann Lee")))).await;

    let (status, body) = send(store.clone(), "GET", "/contacts/Ann%20Lee", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ann Lee");

    let (status, _) = send(store.clone(), "DELETE", "/contacts/Ann%20Lee", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(store.clone(), "GET", "/contacts/Ann%20Lee", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, _) = send(store, "DELETE", "/contacts/Ann%20Lee", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Graph ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn graph_exports_nodes_and_edges() {
    let store = make_store().await;
    for name in ["Alice", "Bob"] {
      send(store.clone(), "POST", "/contacts", Some(submission(Contact::named(name)))).await;
    }
    store
      .store_edges(ComparisonDimension::Interests, &[SharedValue::new("Alice", "Bob", "math")])
      .await
      .unwrap();

    let (status, body) = send(store.clone(), "GET", "/graph", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "nodes": [{ "id": "Alice" }, { "id": "Bob" }], "edges": [] }));

    let (status, body) = send(store, "GET", "/graph/interests", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
      body["edges"],
      json!([{ "source": "Alice", "target": "Bob", "label": "math" }]),
    );
  }

  #[tokio::test]
  async fn graph_location_view_links_shared_locations() {
    let store = make_store().await;
    for (name, location) in [("Ann", "Austin, TX"), ("Ben", "Boston"), ("Cat", "austin, tx")] {
      let c = Contact::named(name).with(Field::Location, location);
      send(store.clone(), "POST", "/contacts", Some(submission(c))).await;
    }

    let (status, body) = send(store, "GET", "/graph/location", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({
      "nodes": [{ "id": "Ann" }, { "id": "Ben" }, { "id": "Cat" }],
      "edges": [{ "source": "Ann", "target": "Cat", "label": "austin, tx" }],
    }));
  }

  #[tokio::test]
  async fn graph_talent_rating_view_tiers_contacts() {
    let store = make_store().await;
    for (name, rating) in [("Junior", "4"), ("Senior", "9"), ("New", "")] {
      let c = Contact::named(name).with(Field::TalentRating, rating);
      send(store.clone(), "POST", "/contacts", Some(submission(c))).await;
    }

    let (status, body) = send(store, "GET", "/graph/talent_rating", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({
      "nodes": [{ "id": "Senior" }, { "id": "Junior" }, { "id": "New" }],
      "edges": [{ "source": "Senior", "target": "Junior", "label": "level 9" }],
    }));
  }

  #[tokio::test]
  async fn graph_unknown_dimension_is_404() {
    let store = make_store().await;
    let (status, body) = send(store, "GET", "/graph/hobbies", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("hobbies"));
  }

  // ── Ask ─────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn ask_sends_every_contact_and_returns_the_answer() {
    let store = make_store().await;
    let alice = Contact::named("Alice").with(Field::Interests, "chess");
    send(store.clone(), "POST", "/contacts", Some(submission(alice))).await;
    send(store.clone(), "POST", "/contacts", Some(submission(Contact::named("Bob")))).await;

    let oracle = Arc::new(Canned::replying("Alice plays chess."));
    let req = request("POST", "/ask", Some(json!({ "question": "Who plays chess?" })));
    let (status, body) = call(api_router(store, oracle.clone()), req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "answer": "Alice plays chess." }));
    let prompts = oracle.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Contact: Alice\n"));
    assert!(prompts[0].contains("- Interests: chess\n"));
    assert!(prompts[0].contains("Contact: Bob\n"));
    assert!(prompts[0].contains("Who plays chess?"));
  }

  #[tokio::test]
  async fn ask_oracle_failure_is_502() {
    let store = make_store().await;
    let req = request("POST", "/ask", Some(json!({ "question": "Anyone?" })));
    let (status, body) = call(api_router(store, Arc::new(Canned::default())), req).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "oracle offline");
  }

  #[tokio::test]
  async fn ask_blank_question_is_400_without_calling_the_oracle() {
    let store = make_store().await;
    let oracle = Arc::new(Canned::replying("unused"));
    let req = request("POST", "/ask", Some(json!({ "question": "   " })));
    let (status, body) = call(api_router(store.clone(), oracle.clone()), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("question"));

    let req = request("POST", "/ask", Some(json!({ "q": "typo" })));
    let (status, _) = call(api_router(store, oracle.clone()), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(oracle.prompts.lock().unwrap().is_empty());
  }
}
