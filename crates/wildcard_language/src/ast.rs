//! Parsed template representation.
//!
//! A [`Template`] is an ordered sequence of literal and directive segments.
//! Templates are immutable once parsed and can be resolved any number of
//! times against independent resolution contexts.

use crate::span::Span;

/// A parsed template.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Creates a template from its segments.
    #[must_use]
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Returns the segments in source order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns true if the template has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns true if any top-level segment is a directive.
    #[must_use]
    pub fn has_directives(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Directive(..)))
    }

    /// Iterates over the top-level directives in source order.
    pub fn directives(&self) -> impl Iterator<Item = &Directive> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Directive(d, _) => Some(d),
            Segment::Literal(..) => None,
        })
    }
}

/// One segment of a template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, escapes already applied.
    Literal(String, Span),
    /// A wildcard directive.
    Directive(Directive, Span),
}

impl Segment {
    /// Returns the source span of this segment.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Literal(_, s) | Self::Directive(_, s) => *s,
        }
    }
}

/// One parsed wildcard construct.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    /// `[name]` or `{name}`: one candidate for `name` chosen at random.
    PlainRef {
        /// The wildcard name, as written (unescaped, trimmed).
        name: String,
    },
    /// `[a|b|c]`: one option chosen uniformly at random.
    ChoiceSet {
        /// The options, each a sub-template.
        options: Vec<Template>,
    },
    /// `[body:3]`: body resolved `count` times and joined.
    Repetition {
        /// The repeated sub-template.
        body: Template,
        /// The literal repetition count.
        count: u32,
    },
    /// `[1:body]`: occurrences of `tag` share one resolved value per scope.
    ConsistentRef {
        /// The user-assigned consistency tag.
        tag: u32,
        /// The sub-template resolved on first encounter.
        body: Template,
    },
}

impl Directive {
    /// Returns a short label for this directive, used in error context.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::PlainRef { name } => format!("\"{name}\""),
            Self::ChoiceSet { options } => format!("choice of {}", options.len()),
            Self::Repetition { count, .. } => format!("repetition x{count}"),
            Self::ConsistentRef { tag, .. } => format!("tag {tag}"),
        }
    }

    /// Returns the wildcard name if this is a plain reference.
    #[must_use]
    pub fn as_plain_ref(&self) -> Option<&str> {
        match self {
            Self::PlainRef { name } => Some(name),
            _ => None,
        }
    }
}
