//! Candidate lookup for wildcard references.
//!
//! A provider maps a wildcard name to its ordered list of candidate
//! replacement strings. The engine treats the provider as read-only and
//! shares one reference across every concurrent resolution context.

use std::collections::HashMap;

/// Source of candidate replacement strings for wildcard names.
///
/// Lookups are case-insensitive: the engine normalizes names to lowercase
/// before calling [`candidates`](CandidateProvider::candidates), and
/// implementations are expected to store their keys normalized the same way.
///
/// An empty return value means the name is unknown; the resolver reports it
/// as an unresolved wildcard.
pub trait CandidateProvider: Sync {
    /// Returns the ordered candidate list for `name`, or an empty vector if
    /// the name is unknown.
    fn candidates(&self, name: &str) -> Vec<String>;
}

/// In-memory candidate provider.
///
/// Used by tests and by embedders that source candidate lists themselves
/// (the surrounding tool injects its wildcard library through this seam).
#[derive(Clone, Debug, Default)]
pub struct MemoryProvider {
    entries: HashMap<String, Vec<String>>,
}

impl MemoryProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a candidate list under `name`, replacing any previous list.
    ///
    /// The name is normalized to lowercase.
    pub fn insert<I, S>(&mut self, name: &str, candidates: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries.insert(
            name.to_lowercase(),
            candidates.into_iter().map(Into::into).collect(),
        );
    }

    /// Builder form of [`insert`](MemoryProvider::insert).
    #[must_use]
    pub fn with_entry<I, S>(mut self, name: &str, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(name, candidates);
        self
    }

    /// Returns the number of known wildcard names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no wildcard names are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CandidateProvider for MemoryProvider {
    fn candidates(&self, name: &str) -> Vec<String> {
        self.entries.get(name).cloned().unwrap_or_default()
    }
}
