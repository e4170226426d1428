//! Recursive template resolution.
//!
//! The resolver walks a parsed [`Template`] against a [`ResolutionContext`],
//! drawing every random choice from the context's generator and recursing
//! into nested directives and candidate content under the configured depth
//! bound.

use tracing::{debug, warn};
use wildcard_foundation::{Error, Result};
use wildcard_language::{Directive, Segment, Template, parse};

use crate::context::ResolutionContext;

/// Resolves a parsed template to its final string.
///
/// # Errors
/// Returns `UnresolvedWildcard`, `RepetitionCountExceeded`,
/// `RecursionLimitExceeded`, or a parse error surfaced from malformed
/// candidate content. Failures are scoped to this instance; the template
/// itself stays valid for other contexts.
pub fn resolve(template: &Template, ctx: &mut ResolutionContext<'_>) -> Result<String> {
    let mut out = String::new();
    resolve_template_into(template, ctx, &mut out)?;
    Ok(out)
}

/// Resolves a single directive to its final string.
///
/// # Errors
/// As for [`resolve`].
pub fn resolve_directive(directive: &Directive, ctx: &mut ResolutionContext<'_>) -> Result<String> {
    let mut out = String::new();
    resolve_directive_into(directive, ctx, &mut out)?;
    Ok(out)
}

/// Resolves every segment of `template` into `out`.
fn resolve_template_into(
    template: &Template,
    ctx: &mut ResolutionContext<'_>,
    out: &mut String,
) -> Result<()> {
    for segment in template.segments() {
        match segment {
            Segment::Literal(text, _) => out.push_str(text),
            Segment::Directive(directive, _) => resolve_directive_into(directive, ctx, out)?,
        }
    }
    Ok(())
}

/// Resolves one directive into `out`.
fn resolve_directive_into(
    directive: &Directive,
    ctx: &mut ResolutionContext<'_>,
    out: &mut String,
) -> Result<()> {
    match directive {
        Directive::PlainRef { name } => resolve_plain_ref(name, ctx, out),

        Directive::ChoiceSet { options } => {
            let index = ctx.choose(options.len());
            debug!(index, options = options.len(), "choice set");
            ctx.descend(|| directive.label())?;
            resolve_template_into(&options[index], ctx, out)?;
            ctx.ascend();
            Ok(())
        }

        Directive::Repetition { body, count } => {
            let limit = ctx.config().max_repetitions;
            if *count > limit {
                return Err(Error::repetition_exceeded(*count, limit));
            }
            let separator = &ctx.config().separator;
            for i in 0..*count {
                if i > 0 {
                    out.push_str(separator);
                }
                // Each repetition draws fresh randomness.
                ctx.descend(|| directive.label())?;
                resolve_template_into(body, ctx, out)?;
                ctx.ascend();
            }
            Ok(())
        }

        Directive::ConsistentRef { tag, body } => {
            if let Some(value) = ctx.cached(*tag) {
                debug!(tag, "tag cache hit");
                out.push_str(&value);
                return Ok(());
            }
            let mut buffer = String::new();
            ctx.descend(|| format!("tag {tag}"))?;
            resolve_template_into(body, ctx, &mut buffer)?;
            ctx.ascend();
            let value = ctx.store(*tag, buffer);
            out.push_str(&value);
            Ok(())
        }
    }
}

/// Resolves a plain wildcard reference into `out`.
fn resolve_plain_ref(name: &str, ctx: &mut ResolutionContext<'_>, out: &mut String) -> Result<()> {
    let candidates = ctx.candidates_for(name);
    if candidates.is_empty() {
        warn!(name, "unresolved wildcard");
        return Err(Error::unresolved_wildcard(name));
    }

    let index = ctx.choose(candidates.len());
    let chosen = &candidates[index];
    ctx.record_choice(name, chosen);
    debug!(name, value = chosen.as_str(), "wildcard resolved");

    if needs_rescan(chosen) {
        // Candidate content may itself contain wildcard syntax.
        let sub = parse(chosen)?;
        ctx.descend(|| format!("\"{name}\""))?;
        resolve_template_into(&sub, ctx, out)?;
        ctx.ascend();
    } else {
        out.push_str(chosen);
    }
    Ok(())
}

/// Returns true if a candidate string must be re-scanned for wildcard
/// syntax. Plain text takes the fast path straight into the output.
fn needs_rescan(candidate: &str) -> bool {
    candidate
        .bytes()
        .any(|b| matches!(b, b'[' | b'{' | b']' | b'}' | b'\\'))
}
