//! Layered configuration: an optional TOML file under `RAPPORT_*` environment
//! variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use rapport_oracle::OracleConfig;
use rapport_pipeline::PipelineConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub store_path: PathBuf,
  pub host:       String,
  pub port:       u16,
  pub oracle:     OracleConfig,
  pub pipeline:   PipelineConfig,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      store_path: PathBuf::from("rapport.db"),
      host:       "127.0.0.1".into(),
      port:       5232,
      oracle:     OracleConfig::default(),
      pipeline:   PipelineConfig::default(),
    }
  }
}

impl Settings {
  /// Read `path` (if it exists) and then `RAPPORT_*` variables, e.g.
  /// `RAPPORT_ORACLE__API_KEY`. `OPENAI_API_KEY` fills in a missing key.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let raw = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("RAPPORT")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()
      .with_context(|| format!("failed to read config from {path:?}"))?;

    let settings: Settings = raw.try_deserialize().context("failed to deserialise settings")?;
    settings.finish(std::env::var("OPENAI_API_KEY").ok())
  }

  fn finish(mut self, openai_key: Option<String>) -> anyhow::Result<Self> {
    if self.oracle.api_key.is_empty()
      && let Some(key) = openai_key
    {
      self.oracle.api_key = key;
    }
    if self.pipeline.chunk_size == 0 {
      anyhow::bail!("pipeline.chunk_size must be at least 1");
    }
    self.store_path = expand_tilde(&self.store_path);
    Ok(self)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn from_toml(toml: &str) -> Settings {
    config::Config::builder()
      .add_source(config::File::from_str(toml, config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn empty_file_gives_defaults() {
    let s = from_toml("");
    assert_eq!(s.store_path, PathBuf::from("rapport.db"));
    assert_eq!(s.port, 5232);
    assert_eq!(s.oracle.model, "gpt-4o");
    assert_eq!(s.oracle.temperature, 0.0);
    assert_eq!(s.oracle.answer_temperature, 0.5);
    assert_eq!(s.pipeline.chunk_size, 50);
  }

  #[test]
  fn nested_tables_override_defaults() {
    let s = from_toml(
      r#"
      port = 8080
      [oracle]
      model = "gpt-4o-mini"
      max_attempts = 5
      [pipeline]
      chunk_size = 10
      "#,
    );
    assert_eq!(s.port, 8080);
    assert_eq!(s.oracle.model, "gpt-4o-mini");
    assert_eq!(s.oracle.max_attempts, 5);
    assert_eq!(s.oracle.timeout_secs, 60);
    assert_eq!(s.pipeline.chunk_size, 10);
  }

  #[test]
  fn openai_key_only_fills_a_missing_key() {
    let s = Settings::default().finish(Some("sk-env".into())).unwrap();
    assert_eq!(s.oracle.api_key, "sk-env");

    let mut configured = Settings::default();
    configured.oracle.api_key = "sk-file".into();
    let s = configured.finish(Some("sk-env".into())).unwrap();
    assert_eq!(s.oracle.api_key, "sk-file");
  }

  #[test]
  fn zero_chunk_size_is_rejected() {
    let mut s = Settings::default();
    s.pipeline.chunk_size = 0;
    assert!(s.finish(None).is_err());
  }
}
