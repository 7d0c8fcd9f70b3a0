//! The comparison job for one dimension.

use rapport_core::{
  dimension::ComparisonDimension,
  oracle::{ComparisonOracle, ComparisonRequest},
  pairs::{ComparisonPair, enumerate_pairs},
  parse::{SharedValue, parse_response},
  store::NetworkStore,
};
use serde::Serialize;

use crate::{Error, PipelineConfig, Result};

/// What one comparison run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonReport {
  pub dimension:     ComparisonDimension,
  /// Eligible pairs enumerated from the contact set.
  pub pairs:         usize,
  pub chunks:        usize,
  pub failed_chunks: usize,
  /// Edges newly written; pairs that already had an edge are not counted.
  pub inserted:      usize,
  pub skipped_lines: usize,
  /// Triples naming a pair that was never asked about.
  pub unrequested:   usize,
}

impl ComparisonReport {
  fn new(dimension: ComparisonDimension, pairs: usize) -> Self {
    Self {
      dimension,
      pairs,
      chunks: 0,
      failed_chunks: 0,
      inserted: 0,
      skipped_lines: 0,
      unrequested: 0,
    }
  }
}

/// Compare every eligible pair along `dimension` and store the shared values.
///
/// Pairs are sent in chunks of `config.chunk_size`. A chunk whose oracle call
/// fails is logged and counted, and the remaining chunks still run. The job
/// fails with [`Error::OracleUnavailable`] only when every chunk failed. A
/// store failure aborts the job; chunks already written stay written.
pub async fn run_comparison<S, O>(
  store: &S,
  oracle: &O,
  dimension: ComparisonDimension,
  config: &PipelineConfig,
) -> Result<ComparisonReport>
where
  S: NetworkStore,
  O: ComparisonOracle,
{
  if config.chunk_size == 0 {
    return Err(Error::InvalidChunkSize);
  }

  let contacts = store.list_contacts().await.map_err(Error::store)?;
  let pairs: Vec<ComparisonPair> = enumerate_pairs(&contacts, dimension.field()).collect();
  let mut report = ComparisonReport::new(dimension, pairs.len());

  if pairs.is_empty() {
    tracing::info!(%dimension, contacts = contacts.len(), "no eligible pairs; skipping oracle");
    return Ok(report);
  }

  for (index, chunk) in pairs.chunks(config.chunk_size).enumerate() {
    report.chunks += 1;
    let request = ComparisonRequest::new(dimension, chunk.to_vec())?;

    let raw = match oracle.compare(&request).await {
      Ok(raw) => raw,
      Err(e) => {
        report.failed_chunks += 1;
        tracing::warn!(%dimension, chunk = index, pairs = chunk.len(), error = %e, "chunk failed");
        continue;
      }
    };

    let parsed = parse_response(&raw);
    for skip in &parsed.skipped {
      tracing::warn!(
        %dimension,
        chunk = index,
        line_no = skip.line_no,
        line = %skip.line,
        reason = %skip.reason,
        "skipped oracle line",
      );
    }
    report.skipped_lines += parsed.skipped.len();

    let (triples, unrequested): (Vec<SharedValue>, Vec<SharedValue>) = parsed
      .triples
      .into_iter()
      .partition(|t| request.requested(&t.person_a, &t.person_b));
    for t in &unrequested {
      tracing::warn!(
        %dimension,
        chunk = index,
        person_a = %t.person_a,
        person_b = %t.person_b,
        "oracle answered for a pair it was not asked about",
      );
    }
    report.unrequested += unrequested.len();

    let inserted = store
      .store_edges(dimension, &triples)
      .await
      .map_err(Error::store)?;
    report.inserted += inserted;
  }

  if report.failed_chunks == report.chunks {
    return Err(Error::OracleUnavailable { dimension, chunks: report.chunks });
  }

  tracing::info!(
    %dimension,
    pairs = report.pairs,
    chunks = report.chunks,
    failed_chunks = report.failed_chunks,
    inserted = report.inserted,
    skipped_lines = report.skipped_lines,
    unrequested = report.unrequested,
    "comparison finished",
  );
  Ok(report)
}
