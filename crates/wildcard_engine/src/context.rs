//! Per-run resolution state.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wildcard_foundation::{CandidateProvider, Error, Result};

use crate::config::ExpandConfig;

/// Consistency-tag cache, keyed by tag alone.
///
/// Cloning yields a handle to the same underlying map, which is how the
/// driver shares one cache across a batch. Writes are single-winner: once a
/// tag is resolved its value is never overwritten, so a racing resolver for
/// the same tag adopts the first stored value instead of double-resolving
/// into it.
#[derive(Clone, Debug, Default)]
pub struct TagCache {
    inner: Arc<Mutex<HashMap<u32, String>>>,
}

impl TagCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `tag`, if any.
    #[must_use]
    pub fn get(&self, tag: u32) -> Option<String> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&tag)
            .cloned()
    }

    /// Stores `value` under `tag` unless the tag is already resolved, and
    /// returns the winning value.
    #[must_use]
    pub fn insert_if_absent(&self, tag: u32, value: String) -> String {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(tag)
            .or_insert(value)
            .clone()
    }

    /// Returns the number of resolved tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if no tags are resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Mutable state for resolving one template instance.
///
/// A context owns its random generator and depth counter; the provider is a
/// shared read-only reference and the tag cache is a cloneable handle, so
/// concurrent instances each own a context while sharing the rest.
pub struct ResolutionContext<'a> {
    /// Candidate source, shared and read-only.
    provider: &'a dyn CandidateProvider,
    /// Limits and joining policy.
    config: &'a ExpandConfig,
    /// Seedable generator; every random draw in the run goes through it.
    rng: ChaCha8Rng,
    /// Consistency-tag cache for this scope.
    cache: TagCache,
    /// Current recursion depth.
    depth: u32,
    /// Chosen candidate values by normalized wildcard name.
    choices: BTreeMap<String, Vec<String>>,
}

impl<'a> ResolutionContext<'a> {
    /// Creates a context with a fresh tag cache.
    #[must_use]
    pub fn new(
        provider: &'a dyn CandidateProvider,
        config: &'a ExpandConfig,
        rng: ChaCha8Rng,
    ) -> Self {
        Self::with_cache(provider, config, rng, TagCache::new())
    }

    /// Creates a context sharing an existing tag cache.
    #[must_use]
    pub fn with_cache(
        provider: &'a dyn CandidateProvider,
        config: &'a ExpandConfig,
        rng: ChaCha8Rng,
        cache: TagCache,
    ) -> Self {
        Self {
            provider,
            config,
            rng,
            cache,
            depth: 0,
            choices: BTreeMap::new(),
        }
    }

    /// Creates a context seeded from a single value.
    #[must_use]
    pub fn seeded(
        provider: &'a dyn CandidateProvider,
        config: &'a ExpandConfig,
        seed: u64,
    ) -> Self {
        Self::new(provider, config, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &'a ExpandConfig {
        self.config
    }

    /// Returns the current recursion depth.
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Returns the chosen candidate values recorded so far, keyed by
    /// normalized wildcard name.
    #[must_use]
    pub fn choices(&self) -> &BTreeMap<String, Vec<String>> {
        &self.choices
    }

    /// Takes the chosen-values report, leaving the context's empty.
    #[must_use]
    pub fn take_choices(&mut self) -> BTreeMap<String, Vec<String>> {
        std::mem::take(&mut self.choices)
    }

    /// Draws a uniform index below `len`. Callers guarantee `len > 0`.
    pub(crate) fn choose(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// Looks up candidates for `name`, normalized to lowercase.
    pub(crate) fn candidates_for(&self, name: &str) -> Vec<String> {
        self.provider.candidates(&name.to_lowercase())
    }

    /// Records a chosen candidate value for the report.
    pub(crate) fn record_choice(&mut self, name: &str, value: &str) {
        self.choices
            .entry(name.to_lowercase())
            .or_default()
            .push(value.to_string());
    }

    /// Returns the cached value for `tag`, if resolved in this scope.
    pub(crate) fn cached(&self, tag: u32) -> Option<String> {
        self.cache.get(tag)
    }

    /// Stores a resolved tag value, keeping any concurrently stored winner.
    pub(crate) fn store(&self, tag: u32, value: String) -> String {
        self.cache.insert_if_absent(tag, value)
    }

    /// Enters one level of recursion, failing when the depth bound is hit.
    pub(crate) fn descend<F>(&mut self, label: F) -> Result<()>
    where
        F: FnOnce() -> String,
    {
        self.depth += 1;
        if self.depth > self.config.max_depth {
            return Err(Error::recursion_exceeded(self.config.max_depth, label()));
        }
        Ok(())
    }

    /// Leaves one level of recursion.
    pub(crate) fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
