//! Integration tests for the resolver
//!
//! Exercises the documented resolution laws: reproducibility, consistency,
//! repetition independence, and the bounded failure model.

use wildcard_engine::{ExpandConfig, ResolutionContext, resolve};
use wildcard_foundation::{ErrorKind, MemoryProvider};
use wildcard_language::parse;

fn resolve_seeded(source: &str, provider: &MemoryProvider, seed: u64) -> Result<String, wildcard_foundation::Error> {
    let template = parse(source)?;
    let config = ExpandConfig::default();
    let mut ctx = ResolutionContext::seeded(provider, &config, seed);
    resolve(&template, &mut ctx)
}

// =============================================================================
// Reproducibility
// =============================================================================

#[test]
fn seeding_makes_resolution_deterministic() {
    let provider = MemoryProvider::new()
        .with_entry("color", ["red", "blue", "green", "gold", "teal"])
        .with_entry("animal", ["cat", "dog", "fox", "owl"]);
    let source = "a [color] [animal] with [1:color] eyes, [pose|profile|candid]";

    for seed in [0, 1, 7, 42, u64::MAX] {
        let first = resolve_seeded(source, &provider, seed).unwrap();
        let second = resolve_seeded(source, &provider, seed).unwrap();
        assert_eq!(first, second, "seed {seed} was not reproducible");
    }
}

#[test]
fn pure_literal_resolution_is_idempotent() {
    let provider = MemoryProvider::new();
    let source = "no wildcards at all, just text";
    for seed in 0..5 {
        assert_eq!(resolve_seeded(source, &provider, seed).unwrap(), source);
    }
}

// =============================================================================
// Consistency Law
// =============================================================================

#[test]
fn consistency_law_holds_across_many_seeds() {
    // With eight candidates, a broken cache would produce differing halves
    // with probability 7/8 per seed; 64 seeds make a false pass negligible.
    let provider = MemoryProvider::new().with_entry(
        "gem",
        ["ruby", "topaz", "jade", "opal", "onyx", "pearl", "agate", "beryl"],
    );
    for seed in 0..64 {
        let out = resolve_seeded("[1:gem]/[1:gem]", &provider, seed).unwrap();
        let (left, right) = out.split_once('/').unwrap();
        assert_eq!(left, right, "consistency broken for seed {seed}");
    }
}

#[test]
fn later_occurrences_reuse_the_tag_value_regardless_of_body() {
    let provider = MemoryProvider::new().with_entry("gem", ["ruby", "topaz"]);
    for seed in 0..16 {
        let out = resolve_seeded("[1:[x|y]]/[1:gem]", &provider, seed).unwrap();
        let (left, right) = out.split_once('/').unwrap();
        assert_eq!(left, right);
        assert!(left == "x" || left == "y");
    }
}

// =============================================================================
// Repetition
// =============================================================================

#[test]
fn repetition_is_not_consistency() {
    // Repeated resolutions draw independently: over 32 seeds with four
    // candidates and six repeats, identical-everywhere output would require
    // astronomically unlikely draws.
    let provider = MemoryProvider::new().with_entry("note", ["do", "re", "mi", "fa"]);
    let mut saw_mixed = false;
    for seed in 0..32 {
        let out = resolve_seeded("[note:6]", &provider, seed).unwrap();
        let parts: Vec<_> = out.split(' ').collect();
        assert_eq!(parts.len(), 6);
        if parts.iter().any(|p| *p != parts[0]) {
            saw_mixed = true;
        }
    }
    assert!(saw_mixed);
}

// =============================================================================
// Failure Model
// =============================================================================

#[test]
fn unresolved_wildcard_names_the_missing_list() {
    let provider = MemoryProvider::new();
    let err = resolve_seeded("[nowhere]", &provider, 0).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::UnresolvedWildcard {
            name: "nowhere".to_string()
        }
    );
}

#[test]
fn cyclic_candidate_lists_fail_predictably() {
    // a -> [b] -> [a] -> ... terminates with a recursion error instead of
    // overflowing the stack.
    let provider = MemoryProvider::new()
        .with_entry("a", ["[b]"])
        .with_entry("b", ["[a]"]);
    let err = resolve_seeded("[a]", &provider, 0).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::RecursionLimitExceeded { .. }
    ));
}

#[test]
fn depth_bound_is_configurable() {
    let provider = MemoryProvider::new().with_entry("loop", ["[loop]"]);
    let template = parse("[loop]").unwrap();
    let config = ExpandConfig::new().with_max_depth(3);
    let mut ctx = ResolutionContext::seeded(&provider, &config, 0);
    let err = resolve(&template, &mut ctx).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::RecursionLimitExceeded { limit: 3, .. }
    ));
}

#[test]
fn deep_but_finite_candidates_resolve() {
    let provider = MemoryProvider::new()
        .with_entry("a", ["[b]"])
        .with_entry("b", ["[c]"])
        .with_entry("c", ["done"]);
    assert_eq!(resolve_seeded("[a]", &provider, 0).unwrap(), "done");
}
