//! Async HTTP client for an OpenAI-compatible chat-completions endpoint.

use std::time::Duration;

use rapport_core::{
  ask::AnswerOracle,
  oracle::{ComparisonOracle, ComparisonRequest, SYSTEM_PROMPT},
};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Connection and retry settings for the oracle.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
  /// Base URL up to and including the API version, e.g.
  /// `https://api.openai.com/v1`.
  pub base_url:           String,
  /// Bearer token. Sent only when non-empty.
  pub api_key:            String,
  pub model:              String,
  /// Sampling temperature for comparisons; `0.0` asks for the least random
  /// answer.
  pub temperature:        f32,
  /// Sampling temperature for free-form questions.
  pub answer_temperature: f32,
  pub timeout_secs:       u64,
  pub max_attempts:       u32,
  pub initial_backoff_ms: u64,
}

impl Default for OracleConfig {
  fn default() -> Self {
    Self {
      base_url:           "https://api.openai.com/v1".into(),
      api_key:            String::new(),
      model:              "gpt-4o".into(),
      temperature:        0.0,
      answer_temperature: 0.5,
      timeout_secs:       60,
      max_attempts:       3,
      initial_backoff_ms: 500,
    }
  }
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatMessage<'a> {
  role:    &'a str,
  content: &'a str,
}

#[derive(Serialize)]
struct ChatReq<'a> {
  model:       &'a str,
  messages:    Vec<ChatMessage<'a>>,
  temperature: f32,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
  content: Option<String>,
}

#[derive(Deserialize)]
struct ChatChoice {
  message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatResp {
  #[serde(default)]
  choices: Vec<ChatChoice>,
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Single-attempt oracle client. Wrap in [`crate::Retrying`] for retries.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct OpenAiOracle {
  client: Client,
  config: OracleConfig,
}

impl OpenAiOracle {
  pub fn new(config: OracleConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;
    Ok(Self { client, config })
  }

  fn url(&self) -> String {
    format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
  }

  async fn complete(&self, system: Option<&str>, prompt: &str, temperature: f32) -> Result<String> {
    let mut messages = Vec::with_capacity(2);
    if let Some(content) = system {
      messages.push(ChatMessage { role: "system", content });
    }
    messages.push(ChatMessage { role: "user", content: prompt });
    let body = ChatReq { model: &self.config.model, messages, temperature };

    let mut req = self.client.post(self.url()).json(&body);
    if !self.config.api_key.is_empty() {
      req = req.bearer_auth(&self.config.api_key);
    }

    let resp = req.send().await?;
    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(Error::Status { status, body });
    }

    let parsed: ChatResp = resp.json().await?;
    parsed
      .choices
      .into_iter()
      .next()
      .and_then(|c| c.message.content)
      .ok_or(Error::EmptyCompletion)
  }
}

impl ComparisonOracle for OpenAiOracle {
  type Error = Error;

  async fn compare<'a>(&'a self, request: &'a ComparisonRequest) -> Result<String> {
    tracing::debug!(
      dimension = %request.dimension,
      pairs = request.pairs.len(),
      prompt_chars = request.prompt.len(),
      model = %self.config.model,
      "sending comparison request",
    );
    self
      .complete(Some(SYSTEM_PROMPT), &request.prompt, self.config.temperature)
      .await
  }

  fn is_retryable(&self, error: &Error) -> bool { error.is_transient() }
}

impl AnswerOracle for OpenAiOracle {
  type Error = Error;

  async fn answer<'a>(&'a self, prompt: &'a str) -> Result<String> {
    tracing::debug!(
      prompt_chars = prompt.len(),
      model = %self.config.model,
      "sending question",
    );
    self.complete(None, prompt, self.config.answer_temperature).await
  }

  fn is_retryable(&self, error: &Error) -> bool { error.is_transient() }
}
