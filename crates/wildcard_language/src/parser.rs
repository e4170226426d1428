//! Parser for the Wildcard template grammar.
//!
//! The parser classifies each scanned wildcard span into a typed
//! [`Directive`] and assembles the span list into a [`Template`].
//!
//! Square-bracket spans are disambiguated positionally: a leading
//! `<integer>:` is a consistency tag, a trailing `:<integer>` is a
//! repetition count, and a top-level `|` splits the content into choice
//! options. The tag prefix is consumed before the count suffix is
//! considered, so `[1:2]` is tag 1 over the name `2`, the same greedy rule
//! the saved-template format has always used. Curly-brace spans hold a bare
//! wildcard name only.

use wildcard_foundation::{Error, Result};

use crate::ast::{Directive, Segment, Template};
use crate::scanner::{RawSpan, Scanner, SpanKind, unescape};
use crate::span::Span;

/// Parses a template source string.
///
/// # Errors
/// Returns `MalformedTemplate` on unbalanced delimiters and
/// `UnknownDirectiveSyntax` on a wildcard span that matches no directive
/// form.
pub fn parse(source: &str) -> Result<Template> {
    Parser::new(source).parse()
}

/// Parser for Wildcard template source.
pub struct Parser<'src> {
    /// Source text being parsed.
    source: &'src str,
    /// Base offset added to reported spans (used for sub-template text).
    offset: usize,
}

impl<'src> Parser<'src> {
    /// Creates a new parser for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self { source, offset: 0 }
    }

    /// Creates a parser whose reported spans are offset by `offset` bytes.
    #[must_use]
    pub fn with_offset(source: &'src str, offset: usize) -> Self {
        Self { source, offset }
    }

    /// Parses the source into a template.
    ///
    /// # Errors
    /// Returns `MalformedTemplate` or `UnknownDirectiveSyntax` as for
    /// [`parse`].
    pub fn parse(&self) -> Result<Template> {
        let spans = Scanner::with_offset(self.source, self.offset).run()?;
        let mut segments = Vec::with_capacity(spans.len());

        for raw in spans {
            let segment = match raw.kind {
                SpanKind::Literal => Segment::Literal(raw.text, raw.span),
                SpanKind::Bracket => {
                    let span = raw.span;
                    Segment::Directive(Self::parse_bracket(&raw)?, span)
                }
                SpanKind::Brace => {
                    let span = raw.span;
                    Segment::Directive(Self::parse_brace(&raw)?, span)
                }
            };
            segments.push(segment);
        }

        Ok(Template::new(segments))
    }

    /// Parses the content of a `[...]` span.
    fn parse_bracket(raw: &RawSpan) -> Result<Directive> {
        let content = raw.text.as_str();
        let base = raw.span.start + 1; // content begins after '['

        let parts = split_top_level(content, '|');
        if parts.len() > 1 {
            let mut options = Vec::with_capacity(parts.len());
            for (part_offset, part) in parts {
                let (trimmed, rel) = trim_with_offset(part, part_offset);
                if trimmed.is_empty() {
                    // Empty options are dropped, as in the saved-template format.
                    continue;
                }
                options.push(Parser::with_offset(trimmed, base + rel).parse()?);
            }
            if options.is_empty() {
                return Err(unknown(raw));
            }
            return Ok(Directive::ChoiceSet { options });
        }

        Self::parse_reference(content, base, raw)
    }

    /// Parses the content of a `{...}` span: a bare wildcard name.
    fn parse_brace(raw: &RawSpan) -> Result<Directive> {
        let (name, _) = trim_with_offset(raw.text.as_str(), 0);
        if is_bare_name(name) {
            return Ok(Directive::PlainRef {
                name: unescape(name),
            });
        }
        Err(unknown(raw))
    }

    /// Parses non-choice bracket content: optional tag prefix, optional
    /// count suffix, and a body that is either a bare name or a nested
    /// sub-template.
    fn parse_reference(content: &str, base: usize, raw: &RawSpan) -> Result<Directive> {
        let (mut body, mut body_offset) = trim_with_offset(content, 0);
        if body.is_empty() {
            return Err(unknown(raw));
        }

        let mut tag = None;
        if let Some((digits, rest, rest_rel)) = split_tag_prefix(body) {
            tag = Some(digits.parse::<u32>().map_err(|_| unknown(raw))?);
            body_offset += rest_rel;
            body = rest;
        }

        let mut count = None;
        if let Some((rest, digits)) = split_count_suffix(body) {
            count = Some(digits.parse::<u32>().map_err(|_| unknown(raw))?);
            body = rest;
        }

        let (body, body_offset) = trim_with_offset(body, body_offset);
        if body.is_empty() {
            return Err(unknown(raw));
        }

        if tag.is_none() && count.is_none() {
            // A plain reference; nested grouping without a tag or count is
            // not a directive form.
            if is_bare_name(body) {
                return Ok(Directive::PlainRef {
                    name: unescape(body),
                });
            }
            return Err(unknown(raw));
        }

        let body_template = Self::parse_body(body, base + body_offset, raw)?;
        let body_span = Span::new(base + body_offset, base + body_offset + body.len());

        let directive = if let Some(count) = count {
            // The count applies to the whole span and the tag to its body,
            // so the repeats of `[1:item:3]` share the tagged value.
            let repeated = if let Some(tag) = tag {
                let inner = Directive::ConsistentRef {
                    tag,
                    body: body_template,
                };
                Template::new(vec![Segment::Directive(inner, body_span)])
            } else {
                body_template
            };
            Directive::Repetition {
                body: repeated,
                count,
            }
        } else if let Some(tag) = tag {
            Directive::ConsistentRef {
                tag,
                body: body_template,
            }
        } else {
            return Err(unknown(raw));
        };

        Ok(directive)
    }

    /// Parses a tag or repetition body: a bare name becomes a plain
    /// reference, nested content becomes a sub-template.
    fn parse_body(body: &str, offset: usize, raw: &RawSpan) -> Result<Template> {
        if is_bare_name(body) {
            let span = Span::new(offset, offset + body.len());
            return Ok(Template::new(vec![Segment::Directive(
                Directive::PlainRef {
                    name: unescape(body),
                },
                span,
            )]));
        }
        if has_unescaped_opener(body) {
            return Parser::with_offset(body, offset).parse();
        }
        Err(unknown(raw))
    }
}

/// Builds the unknown-directive error for a span.
fn unknown(raw: &RawSpan) -> Error {
    Error::unknown_directive(raw.text.clone(), raw.span.start)
}

/// Splits `content` at every unescaped `separator` outside nested spans.
///
/// Returns `(offset, part)` pairs; the full content is one part when the
/// separator never occurs at the top level.
fn split_top_level(content: &str, separator: char) -> Vec<(usize, &str)> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    let mut iter = content.char_indices();

    while let Some((i, c)) = iter.next() {
        match c {
            '\\' => {
                iter.next();
            }
            '[' | '{' => depth += 1,
            ']' | '}' => depth -= 1,
            c if c == separator && depth == 0 => {
                parts.push((start, &content[start..i]));
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push((start, &content[start..]));
    parts
}

/// Returns the byte offset of the first unescaped top-level `target`.
fn first_top_level(content: &str, target: char) -> Option<usize> {
    let mut depth = 0i32;
    let mut iter = content.char_indices();
    while let Some((i, c)) = iter.next() {
        match c {
            '\\' => {
                iter.next();
            }
            '[' | '{' => depth += 1,
            ']' | '}' => depth -= 1,
            c if c == target && depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Returns the byte offset of the last unescaped top-level `target`.
fn last_top_level(content: &str, target: char) -> Option<usize> {
    let mut depth = 0i32;
    let mut found = None;
    let mut iter = content.char_indices();
    while let Some((i, c)) = iter.next() {
        match c {
            '\\' => {
                iter.next();
            }
            '[' | '{' => depth += 1,
            ']' | '}' => depth -= 1,
            c if c == target && depth == 0 => found = Some(i),
            _ => {}
        }
    }
    found
}

/// Splits a leading `<digits>:` consistency-tag prefix.
///
/// Returns `(digits, rest, rest_offset)` when the text before the first
/// top-level colon is all digits.
fn split_tag_prefix(content: &str) -> Option<(&str, &str, usize)> {
    let idx = first_top_level(content, ':')?;
    let prefix = content[..idx].trim();
    if !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit()) {
        Some((prefix, &content[idx + 1..], idx + 1))
    } else {
        None
    }
}

/// Splits a trailing `:<digits>` repetition-count suffix.
///
/// Returns `(body, digits)` when the text after the last top-level colon is
/// all digits.
fn split_count_suffix(content: &str) -> Option<(&str, &str)> {
    let idx = last_top_level(content, ':')?;
    let suffix = content[idx + 1..].trim();
    if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) {
        Some((&content[..idx], suffix))
    } else {
        None
    }
}

/// Trims whitespace, adjusting the part's byte offset for the leading cut.
fn trim_with_offset(text: &str, offset: usize) -> (&str, usize) {
    let trimmed_start = text.trim_start();
    let offset = offset + (text.len() - trimmed_start.len());
    (trimmed_start.trim_end(), offset)
}

/// Returns true if `text` is a bare wildcard name: non-empty with no
/// unescaped structural characters.
fn is_bare_name(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '[' | ']' | '{' | '}' | '|' | ':' => return false,
            _ => {}
        }
    }
    true
}

/// Returns true if `text` contains an unescaped span opener.
fn has_unescaped_opener(text: &str) -> bool {
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '[' | '{' => return true,
            _ => {}
        }
    }
    false
}
