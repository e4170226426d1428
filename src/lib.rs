//! Wildcard - prompt template expansion engine
//!
//! This crate re-exports all layers of the Wildcard system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: wildcard_runtime    — File-backed wildcard store, REPL, CLI
//! Layer 2: wildcard_engine     — Resolution context, resolver, expansion driver
//! Layer 1: wildcard_language   — Scanner, directive parser, template AST
//! Layer 0: wildcard_foundation — Error types, candidate provider
//! ```

pub use wildcard_engine as engine;
pub use wildcard_foundation as foundation;
pub use wildcard_language as language;
pub use wildcard_runtime as runtime;
