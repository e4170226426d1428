//! Integration tests for the directive parser
//!
//! Tests the grammar surface: plain references in both delimiter families,
//! choice sets, repetition counts, consistency tags, and the positional
//! colon rule.

use wildcard_foundation::ErrorKind;
use wildcard_language::{Directive, Segment, parse};

fn only_directive(source: &str) -> Directive {
    let template = parse(source).unwrap();
    let directives: Vec<_> = template.directives().cloned().collect();
    assert_eq!(directives.len(), 1, "expected one directive in {source:?}");
    directives.into_iter().next().unwrap()
}

// =============================================================================
// Grammar Surface
// =============================================================================

#[test]
fn bracket_and_brace_references_are_equivalent() {
    let bracket = only_directive("[color]");
    let brace = only_directive("{color}");
    assert_eq!(bracket, brace);
    assert_eq!(bracket.as_plain_ref(), Some("color"));
}

#[test]
fn choice_set_splits_on_top_level_pipes() {
    let Directive::ChoiceSet { options } = only_directive("[a|b|c]") else {
        panic!("expected choice set");
    };
    assert_eq!(options.len(), 3);
}

#[test]
fn consistency_tag_is_integer_before_colon() {
    let Directive::ConsistentRef { tag, .. } = only_directive("[1:item]") else {
        panic!("expected consistent ref");
    };
    assert_eq!(tag, 1);
}

#[test]
fn repetition_count_is_integer_after_colon() {
    let Directive::Repetition { count, .. } = only_directive("[item:3]") else {
        panic!("expected repetition");
    };
    assert_eq!(count, 3);
}

#[test]
fn positional_rule_is_strict() {
    // The same colon means two different things depending on which side
    // holds the integer; `[1:2]` resolves the ambiguity toward the tag.
    assert!(matches!(
        only_directive("[2:thing]"),
        Directive::ConsistentRef { tag: 2, .. }
    ));
    assert!(matches!(
        only_directive("[thing:2]"),
        Directive::Repetition { count: 2, .. }
    ));
    assert!(matches!(
        only_directive("[1:2]"),
        Directive::ConsistentRef { tag: 1, .. }
    ));
}

#[test]
fn tag_and_count_nest_repetition_outermost() {
    let Directive::Repetition { body, count } = only_directive("[1:item:4]") else {
        panic!("expected repetition");
    };
    assert_eq!(count, 4);
    assert!(matches!(
        body.directives().next(),
        Some(Directive::ConsistentRef { tag: 1, .. })
    ));
}

#[test]
fn nested_bodies_parse_recursively() {
    let Directive::ConsistentRef { body, .. } = only_directive("[1:[x|y]]") else {
        panic!("expected consistent ref");
    };
    assert!(matches!(
        body.directives().next(),
        Some(Directive::ChoiceSet { .. })
    ));
}

// =============================================================================
// Templates
// =============================================================================

#[test]
fn literal_text_is_preserved_verbatim() {
    let template = parse("a photo of [animal], studio lighting").unwrap();
    let Segment::Literal(head, _) = &template.segments()[0] else {
        panic!("expected leading literal");
    };
    assert_eq!(head, "a photo of ");
    let Segment::Literal(tail, _) = &template.segments()[2] else {
        panic!("expected trailing literal");
    };
    assert_eq!(tail, ", studio lighting");
}

#[test]
fn parsed_templates_are_structurally_equal() {
    let source = "a [b|c] {d} [1:e] [f:2] g";
    assert_eq!(parse(source).unwrap(), parse(source).unwrap());
}

#[test]
fn template_is_reusable_after_parsing() {
    // Parsing hands back an immutable value: cloning and comparing is all
    // it takes to share it across contexts.
    let template = parse("[a|b]").unwrap();
    let copy = template.clone();
    assert_eq!(template, copy);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn unknown_directive_names_span_and_offset() {
    let err = parse("good [a:b] bad").unwrap_err();
    let ErrorKind::UnknownDirectiveSyntax { span, offset } = err.kind else {
        panic!("expected unknown directive syntax");
    };
    assert_eq!(span, "a:b");
    assert_eq!(offset, 5);
}

#[test]
fn malformed_template_aborts_parsing() {
    assert!(parse("[a|b").is_err());
    assert!(parse("{name").is_err());
    assert!(parse("name}").is_err());
}

#[test]
fn empty_directive_forms_are_rejected() {
    for source in ["[]", "{}", "[ ]", "[1:]", "[:3]", "[|]"] {
        assert!(parse(source).is_err(), "expected error for {source:?}");
    }
}
