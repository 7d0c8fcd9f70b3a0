//! `rapport`: contact network server and batch jobs.
//!
//! Reads `rapport.toml` (or the path given with `--config`) layered under
//! `RAPPORT_*` environment variables, opens the SQLite store, and runs one
//! subcommand against it.

mod settings;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rapport_core::{
  ask::{AnswerOracle as _, build_ask_prompt},
  dimension::{ComparisonDimension, GroupDimension},
  import::parse_contacts,
  store::{NetworkStore, Outcome},
};
use rapport_oracle::{OpenAiOracle, RetryPolicy, Retrying};
use rapport_pipeline::{run_comparison, run_grouping};
use rapport_store_sqlite::SqliteStore;
use strum::IntoEnumIterator as _;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

#[derive(Parser)]
#[command(author, version, about = "Contact network with inferred relationships")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "rapport.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the JSON API.
  Serve,

  /// Ask the oracle which contacts share interests, goals or skills.
  Compare {
    /// Dimensions to compare. Defaults to all of them.
    dimensions: Vec<ComparisonDimension>,
  },

  /// Recompute employer, school and industry groups.
  Group {
    /// Dimensions to group by. Defaults to all of them.
    dimensions: Vec<GroupDimension>,
  },

  /// Reconcile contacts from a pipe-delimited file, one per line.
  Import { file: PathBuf },

  /// Remove a contact by exact name.
  Remove { name: String },

  /// Ask the oracle a question about the whole network.
  Ask { question: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;

  let store = SqliteStore::open(&settings.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;

  match cli.command {
    Command::Serve => serve(store, &settings).await,
    Command::Compare { dimensions } => compare(&store, &settings, dimensions).await,
    Command::Group { dimensions } => group(&store, dimensions).await,
    Command::Import { file } => import(&store, &file).await,
    Command::Remove { name } => remove(&store, &name).await,
    Command::Ask { question } => ask(&store, &settings, &question).await,
  }
}

// ─── Subcommands ─────────────────────────────────────────────────────────────

fn build_oracle(settings: &Settings) -> anyhow::Result<Retrying<OpenAiOracle>> {
  if settings.oracle.api_key.is_empty() {
    tracing::warn!("no oracle API key configured; requests will be sent unauthenticated");
  }
  let client = OpenAiOracle::new(settings.oracle.clone()).context("failed to build oracle client")?;
  Ok(Retrying::new(client, RetryPolicy::from(&settings.oracle)))
}

async fn serve(store: SqliteStore, settings: &Settings) -> anyhow::Result<()> {
  let oracle = Arc::new(build_oracle(settings)?);
  let app = rapport_api::api_router(Arc::new(store), oracle).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", settings.host, settings.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}

/// Each dimension runs on its own; one failing does not stop the rest.
async fn compare(
  store: &SqliteStore,
  settings: &Settings,
  dimensions: Vec<ComparisonDimension>,
) -> anyhow::Result<()> {
  let oracle = build_oracle(settings)?;

  let dimensions = if dimensions.is_empty() {
    ComparisonDimension::iter().collect()
  } else {
    dimensions
  };

  let mut failed = Vec::new();
  for dimension in dimensions {
    if let Err(e) = run_comparison(store, &oracle, dimension, &settings.pipeline).await {
      tracing::error!(%dimension, error = %e, "comparison failed");
      failed.push(dimension.to_string());
    }
  }

  if !failed.is_empty() {
    anyhow::bail!("comparison failed for: {}", failed.join(", "));
  }
  Ok(())
}

async fn group(store: &SqliteStore, dimensions: Vec<GroupDimension>) -> anyhow::Result<()> {
  let dimensions = if dimensions.is_empty() {
    GroupDimension::iter().collect()
  } else {
    dimensions
  };

  for dimension in dimensions {
    run_grouping(store, dimension)
      .await
      .with_context(|| format!("grouping by {dimension} failed"))?;
  }
  Ok(())
}

async fn import(store: &SqliteStore, file: &Path) -> anyhow::Result<()> {
  let body = tokio::fs::read_to_string(file)
    .await
    .with_context(|| format!("failed to read {file:?}"))?;
  let batch = parse_contacts(&body);

  for rejected in &batch.rejected {
    tracing::warn!(
      line_no = rejected.line_no,
      fields = rejected.fields,
      "skipped line: too few fields or blank name",
    );
  }

  let (mut created, mut updated) = (0usize, 0usize);
  for contact in batch.contacts {
    let name = contact.name.clone();
    let r = store
      .reconcile(contact)
      .await
      .with_context(|| format!("failed to store {name:?}"))?;
    for field in &r.cleared {
      tracing::warn!(%name, %field, "import cleared a populated field");
    }
    match r.outcome {
      Outcome::Created => created += 1,
      Outcome::Updated => updated += 1,
    }
  }

  tracing::info!(created, updated, rejected = batch.rejected.len(), "import finished");
  Ok(())
}

async fn ask(store: &SqliteStore, settings: &Settings, question: &str) -> anyhow::Result<()> {
  let contacts = store.list_contacts().await.context("failed to load contacts")?;
  let prompt = build_ask_prompt(&contacts, question)?;
  let answer = build_oracle(settings)?.answer(&prompt).await.context("oracle did not answer")?;
  println!("{answer}");
  Ok(())
}

async fn remove(store: &SqliteStore, name: &str) -> anyhow::Result<()> {
  if !store.remove_contact(name).await.context("failed to remove contact")? {
    anyhow::bail!("no contact named {name:?}");
  }
  tracing::info!(%name, "contact removed");
  Ok(())
}
