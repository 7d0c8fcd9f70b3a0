//! Comparison-oracle transports.
//!
//! [`OpenAiOracle`] talks to any OpenAI-compatible chat-completions endpoint.
//! [`Retrying`] wraps any [`ComparisonOracle`](rapport_core::oracle::ComparisonOracle)
//! or [`AnswerOracle`](rapport_core::ask::AnswerOracle) with a per-attempt
//! timeout and bounded exponential backoff.

mod client;
mod retry;

pub mod error;

pub use client::{OpenAiOracle, OracleConfig};
pub use error::{Error, Result};
pub use retry::{RetryPolicy, Retrying};
