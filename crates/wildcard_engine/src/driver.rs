//! The expansion driver: the public batch entry point.
//!
//! `Expander` parses a template once and resolves it N times, creating one
//! resolution context per instance. The consistency scope decides whether
//! instances share one tag cache or get a fresh cache each; seeds derive
//! per-instance from one base seed so a single `u64` reproduces a whole
//! batch.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;
use wildcard_foundation::{CandidateProvider, Error, Result};
use wildcard_language::{Template, parse};

use crate::config::ExpandConfig;
use crate::context::{ResolutionContext, TagCache};
use crate::resolver::{resolve, resolve_directive};

/// How consistency tags are scoped across a batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConsistencyScope {
    /// Fresh tag cache per instance: tags are consistent within one
    /// instance's output only.
    #[default]
    PerInstance,
    /// One shared tag cache across the batch: a tag resolved in instance 0
    /// returns the same value in instance 5.
    AcrossBatch,
}

/// One successfully resolved instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolved {
    /// The fully resolved prompt text.
    pub text: String,
    /// Chosen candidate values by normalized wildcard name, one entry per
    /// draw, in resolution order.
    pub choices: BTreeMap<String, Vec<String>>,
}

/// Per-instance outcomes of one expansion request.
///
/// Resolve-time failures are captured per instance so callers can report
/// partial success; only parse errors abort the whole request.
#[derive(Debug)]
pub struct BatchResult {
    /// Outcomes in instance order.
    pub instances: Vec<Result<Resolved>>,
}

impl BatchResult {
    /// Returns the number of instances in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns true if the batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Iterates over successfully resolved instances.
    pub fn successes(&self) -> impl Iterator<Item = &Resolved> {
        self.instances.iter().filter_map(|r| r.as_ref().ok())
    }

    /// Iterates over per-instance failures.
    pub fn failures(&self) -> impl Iterator<Item = &Error> {
        self.instances.iter().filter_map(|r| r.as_ref().err())
    }
}

/// The expansion driver.
///
/// Holds a shared read-only provider reference and a configuration; it is
/// cheap to construct per request.
pub struct Expander<'p> {
    provider: &'p dyn CandidateProvider,
    config: ExpandConfig,
}

impl<'p> Expander<'p> {
    /// Creates an expander with the default configuration.
    #[must_use]
    pub fn new(provider: &'p dyn CandidateProvider) -> Self {
        Self {
            provider,
            config: ExpandConfig::default(),
        }
    }

    /// Builder method to set the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ExpandConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &ExpandConfig {
        &self.config
    }

    /// Parses `source` once and resolves `count` instances of it.
    ///
    /// `seed` fixes the base seed for reproducibility; `None` draws one from
    /// OS entropy. Instance `i` runs on `base_seed + i`.
    ///
    /// # Errors
    /// Returns parse errors (`MalformedTemplate`, `UnknownDirectiveSyntax`)
    /// before any instance is attempted. Resolve-time failures land in the
    /// returned batch instead.
    pub fn expand(
        &self,
        source: &str,
        count: usize,
        scope: ConsistencyScope,
        seed: Option<u64>,
    ) -> Result<BatchResult> {
        let template = parse(source)?;
        Ok(self.expand_template(&template, count, scope, seed))
    }

    /// Resolves `count` instances of an already-parsed template.
    #[must_use]
    pub fn expand_template(
        &self,
        template: &Template,
        count: usize,
        scope: ConsistencyScope,
        seed: Option<u64>,
    ) -> BatchResult {
        let base_seed = seed.unwrap_or_else(rand::random);
        debug!(count, ?scope, base_seed, "expanding template");

        let shared_cache = TagCache::new();
        let mut instances = Vec::with_capacity(count);

        for i in 0..count {
            let rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(i as u64));
            let cache = match scope {
                ConsistencyScope::PerInstance => TagCache::new(),
                ConsistencyScope::AcrossBatch => shared_cache.clone(),
            };
            let mut ctx = ResolutionContext::with_cache(self.provider, &self.config, rng, cache);
            let outcome = resolve(template, &mut ctx).map(|text| Resolved {
                text,
                choices: ctx.take_choices(),
            });
            instances.push(outcome);
        }

        BatchResult { instances }
    }

    /// Resolves only the `index`-th top-level wildcard of `source`
    /// (1-based), leaving the rest of the template untouched.
    ///
    /// Returns `Ok(None)` when the template has fewer than `index`
    /// directives. The surrounding tool uses this to re-roll a single
    /// wildcard in place.
    ///
    /// # Errors
    /// Returns parse errors for the whole source, and resolve errors for the
    /// selected directive.
    pub fn resolve_nth(
        &self,
        source: &str,
        index: usize,
        seed: Option<u64>,
    ) -> Result<Option<Resolved>> {
        let template = parse(source)?;
        let Some(position) = index.checked_sub(1) else {
            return Ok(None);
        };
        let Some(directive) = template.directives().nth(position) else {
            return Ok(None);
        };

        let base_seed = seed.unwrap_or_else(rand::random);
        let mut ctx = ResolutionContext::seeded(self.provider, &self.config, base_seed);
        let text = resolve_directive(directive, &mut ctx)?;
        Ok(Some(Resolved {
            text,
            choices: ctx.take_choices(),
        }))
    }
}
