//! Scanner, directive parser, and template AST for the Wildcard grammar.
//!
//! This crate provides:
//! - [`Scanner`] - Splitting raw template text into literal and wildcard spans
//! - [`Parser`] - Parsing spans into a [`Template`] of typed directives
//! - [`Template`] / [`Directive`] - The immutable parsed representation
//!
//! Parsing is pure: it never consults a candidate provider or a random
//! source, and parsing the same source twice yields structurally equal
//! templates.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ast;
pub mod parser;
pub mod scanner;
pub mod span;


pub use ast::{Directive, Segment, Template};
pub use parser::{Parser, parse};
pub use scanner::{RawSpan, Scanner, SpanKind};
pub use span::Span;
