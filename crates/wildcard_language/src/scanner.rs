//! Scanner for the Wildcard template grammar.
//!
//! The scanner walks a raw template string once and splits it into literal
//! spans and balanced wildcard spans. Two delimiter families introduce
//! wildcard spans: square brackets (`[...]`) and curly braces (`{...}`).
//! Nesting is tracked per family by depth counting, so `[a|[x|y]]` is a
//! single span.
//!
//! The escape marker is a backslash: `\[`, `\]`, `\{`, `\}`, `\|`, `\:`, and
//! `\\` emit the literal character, and an escaped delimiter neither opens
//! nor closes a span. A backslash before any other character is kept
//! literally. Literal spans are emitted with escapes applied; wildcard span
//! content keeps its escapes intact for the parser.

use wildcard_foundation::{Error, Result};

use crate::span::Span;

/// Classification of a scanned span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpanKind {
    /// Literal text between wildcard spans.
    Literal,
    /// A `[...]` wildcard span.
    Bracket,
    /// A `{...}` wildcard span.
    Brace,
}

/// A scanned span of template source.
///
/// Spans preserve the original ordering and adjacency: concatenating the
/// source ranges of all spans reproduces the input with no gaps or overlaps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawSpan {
    /// Span classification.
    pub kind: SpanKind,
    /// Literal spans carry unescaped text; wildcard spans carry their inner
    /// content with delimiters stripped and escapes intact.
    pub text: String,
    /// Source location (delimiters included for wildcard spans).
    pub span: Span,
}

/// Scanner for Wildcard template source.
pub struct Scanner<'src> {
    /// Source text being scanned.
    source: &'src str,
    /// Remaining source text.
    rest: &'src str,
    /// Current byte offset in source.
    position: usize,
    /// Base offset added to reported span positions (used when scanning
    /// sub-template text carved out of a larger source).
    offset: usize,
}

impl<'src> Scanner<'src> {
    /// Creates a new scanner for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self::with_offset(source, 0)
    }

    /// Creates a scanner whose reported spans are offset by `offset` bytes.
    #[must_use]
    pub fn with_offset(source: &'src str, offset: usize) -> Self {
        Self {
            source,
            rest: source,
            position: 0,
            offset,
        }
    }

    /// Scans the whole source and returns its spans.
    ///
    /// # Errors
    /// Returns `MalformedTemplate` on an unbalanced delimiter, naming the
    /// byte offset of the unmatched opener or the stray closer.
    pub fn scan_all(source: &str) -> Result<Vec<RawSpan>> {
        Scanner::new(source).run()
    }

    /// Scans the remaining source and returns its spans.
    ///
    /// # Errors
    /// Returns `MalformedTemplate` on an unbalanced delimiter.
    pub fn run(mut self) -> Result<Vec<RawSpan>> {
        let mut spans = Vec::new();
        while let Some(span) = self.next_span()? {
            spans.push(span);
        }
        Ok(spans)
    }

    /// Returns the next span, or `None` at end of input.
    ///
    /// # Errors
    /// Returns `MalformedTemplate` on an unbalanced delimiter.
    pub fn next_span(&mut self) -> Result<Option<RawSpan>> {
        let Some(c) = self.peek_char() else {
            return Ok(None);
        };

        let span = match c {
            '[' => self.scan_wildcard('[', ']', SpanKind::Bracket)?,
            '{' => self.scan_wildcard('{', '}', SpanKind::Brace)?,
            ']' | '}' => {
                return Err(Error::malformed_template(c, self.offset + self.position));
            }
            _ => self.scan_literal(),
        };
        Ok(Some(span))
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Advances past the next character.
    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            let len = c.len_utf8();
            self.rest = &self.rest[len..];
            self.position += len;
        }
    }

    /// Scans literal text up to the next unescaped delimiter.
    fn scan_literal(&mut self) -> RawSpan {
        let start = self.position;
        let mut text = String::new();

        while let Some(c) = self.peek_char() {
            match c {
                '[' | '{' | ']' | '}' => break,
                '\\' => {
                    self.advance();
                    match self.peek_char() {
                        Some(e) if is_escapable(e) => {
                            self.advance();
                            text.push(e);
                        }
                        // Not an escape sequence; the backslash stands.
                        Some(_) | None => text.push('\\'),
                    }
                }
                _ => {
                    self.advance();
                    text.push(c);
                }
            }
        }

        RawSpan {
            kind: SpanKind::Literal,
            text,
            span: Span::new(self.offset + start, self.offset + self.position),
        }
    }

    /// Scans a wildcard span from its opening delimiter to the matching
    /// closer, tracking nesting depth for the same delimiter family.
    fn scan_wildcard(&mut self, open: char, close: char, kind: SpanKind) -> Result<RawSpan> {
        let start = self.position;
        self.advance(); // consume opener
        let content_start = self.position;
        let mut depth = 1u32;

        loop {
            let Some(c) = self.peek_char() else {
                return Err(Error::malformed_template(open, self.offset + start));
            };
            if c == '\\' {
                self.advance();
                // Skip the escaped character; it stays raw for the parser.
                self.advance();
                continue;
            }
            self.advance();
            if c == open {
                depth += 1;
            } else if c == close {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
        }

        let content = &self.source[content_start..self.position - close.len_utf8()];
        Ok(RawSpan {
            kind,
            text: content.to_string(),
            span: Span::new(self.offset + start, self.offset + self.position),
        })
    }
}

/// Returns true if `c` has meaning to the grammar and can be escaped.
pub(crate) fn is_escapable(c: char) -> bool {
    matches!(c, '[' | ']' | '{' | '}' | '|' | ':' | '\\')
}

/// Applies backslash escapes to `text`, producing the literal characters.
pub(crate) fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(e) if is_escapable(e) => out.push(e),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}
