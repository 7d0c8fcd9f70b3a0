//! Core types and algorithms for the rapport contact network.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends, the oracle transport and the batch jobs all depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod ask;
pub mod contact;
pub mod dimension;
pub mod error;
pub mod graph;
pub mod group;
pub mod import;
pub mod merge;
pub mod oracle;
pub mod pairs;
pub mod parse;
pub mod store;

pub use error::{Error, Result};
