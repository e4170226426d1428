//! Error types and the candidate provider seam for Wildcard.
//!
//! This crate provides:
//! - [`Error`] - Structured errors for scanning, parsing, and resolution
//! - [`Result`] - Crate-wide result alias
//! - [`CandidateProvider`] - Source of replacement strings for wildcard names
//! - [`MemoryProvider`] - In-memory provider for tests and embedding

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod provider;

pub use error::{Error, ErrorKind, Result};
pub use provider::{CandidateProvider, MemoryProvider};
