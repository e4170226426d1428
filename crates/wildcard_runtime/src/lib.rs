//! File-backed wildcard store, REPL, and CLI for Wildcard.
//!
//! This crate provides:
//! - [`WildcardStore`] - A candidate provider backed by a directory of
//!   `<name>.json` files, with caching and outcome scoring
//! - [`Repl`] - An interactive expansion loop
//! - The `wildcard` CLI binary
//!
//! All file I/O lives here, outside the engine: the store hands candidate
//! lists to the engine through the `CandidateProvider` seam.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod repl;
pub mod store;

pub use repl::Repl;
pub use store::{Outcome, StoreError, WildcardEntry, WildcardStore};
