//! Error types for the Wildcard system.
//!
//! Uses `thiserror` for ergonomic error definition. Parse-time errors
//! (`MalformedTemplate`, `UnknownDirectiveSyntax`) abort a whole expansion
//! request; resolve-time errors are scoped to a single instance of a batch.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Wildcard operations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub const fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Creates an unbalanced-delimiter error at the given byte offset.
    #[must_use]
    pub const fn malformed_template(delimiter: char, offset: usize) -> Self {
        Self::new(ErrorKind::MalformedTemplate { delimiter, offset })
    }

    /// Creates an unrecognized-directive error for the given span content.
    #[must_use]
    pub fn unknown_directive(span: impl Into<String>, offset: usize) -> Self {
        Self::new(ErrorKind::UnknownDirectiveSyntax {
            span: span.into(),
            offset,
        })
    }

    /// Creates an empty-candidate-list error for the given wildcard name.
    #[must_use]
    pub fn unresolved_wildcard(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnresolvedWildcard { name: name.into() })
    }

    /// Creates a repetition-bound error.
    #[must_use]
    pub const fn repetition_exceeded(count: u32, limit: u32) -> Self {
        Self::new(ErrorKind::RepetitionCountExceeded { count, limit })
    }

    /// Creates a recursion-bound error naming the offending tag or name.
    #[must_use]
    pub fn recursion_exceeded(limit: u32, context: impl Into<String>) -> Self {
        Self::new(ErrorKind::RecursionLimitExceeded {
            limit,
            context: context.into(),
        })
    }

    /// Creates an internal error (should not happen).
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }

    /// Returns true if this error aborts the whole expansion request rather
    /// than a single instance.
    #[must_use]
    pub const fn is_parse_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::MalformedTemplate { .. } | ErrorKind::UnknownDirectiveSyntax { .. }
        )
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unbalanced delimiter in the template source.
    #[error("malformed template: unmatched '{delimiter}' at offset {offset}")]
    MalformedTemplate {
        /// The unmatched delimiter character.
        delimiter: char,
        /// Byte offset of the unmatched delimiter in the source.
        offset: usize,
    },

    /// Wildcard span content that matches no known directive form.
    #[error("unknown directive syntax at offset {offset}: \"{span}\"")]
    UnknownDirectiveSyntax {
        /// The offending span content, delimiters stripped.
        span: String,
        /// Byte offset of the span in the source.
        offset: usize,
    },

    /// A referenced wildcard name has no candidates.
    #[error("unresolved wildcard: no candidates for \"{name}\"")]
    UnresolvedWildcard {
        /// The wildcard name that could not be resolved.
        name: String,
    },

    /// A repetition count above the configured bound.
    #[error("repetition count {count} exceeds the configured maximum {limit}")]
    RepetitionCountExceeded {
        /// The requested repetition count.
        count: u32,
        /// The configured upper bound.
        limit: u32,
    },

    /// Resolution recursed past the configured depth bound.
    #[error("recursion limit {limit} exceeded while resolving {context}")]
    RecursionLimitExceeded {
        /// The configured depth bound.
        limit: u32,
        /// The tag or wildcard name being resolved when the bound was hit.
        context: String,
    },

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}
