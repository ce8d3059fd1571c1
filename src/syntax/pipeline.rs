//! Highlight pipeline
//!
//! Runs a configuration's queries over source text, recursing into nested
//! language regions through a [`LanguageProvider`], and styles the resulting
//! tokens through an [`AttributeProvider`].
//!
//! ```text
//! execute queries → tokens + regions
//!                 → regions: provider lookup → recurse on substring → offset
//!                   (excluded child spans are blanked and keep base styling)
//!                 → tokens outside recursed regions: flatten → style
//!                 → merge (nested ranges replace base ranges in their span)
//! ```

use std::ops::Range;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{FuturesUnordered, StreamExt};

use super::configuration::LanguageConfiguration;
use super::document_type::DocumentType;
use super::highlights::{NestedRegion, QueryEvent, StyledRange, StyledText, Token};
use crate::context::RenderingContext;
use crate::theme::Style;

/// Resolves a configuration for an embedded language
///
/// `None` means the language is unsupported; the region keeps the enclosing
/// grammar's styling.
#[async_trait]
pub trait LanguageProvider: Send + Sync {
    async fn language_configuration(
        &self,
        doc_type: &DocumentType,
    ) -> Option<Arc<LanguageConfiguration>>;
}

/// Maps a token to a style; must not block
pub trait AttributeProvider: Send + Sync {
    fn style(&self, token: &Token, context: &RenderingContext) -> Style;
}

impl<F> AttributeProvider for F
where
    F: Fn(&Token, &RenderingContext) -> Style + Send + Sync,
{
    fn style(&self, token: &Token, context: &RenderingContext) -> Style {
        self(token, context)
    }
}

pub const DEFAULT_MAX_INJECTION_DEPTH: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightOptions {
    /// How many levels of nested regions are recursed into; 0 disables nesting
    pub max_injection_depth: u32,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            max_injection_depth: DEFAULT_MAX_INJECTION_DEPTH,
        }
    }
}

/// Highlight `source` with the `root` configuration
///
/// Suspends only while `languages` resolves nested configurations. The output
/// ranges are strictly ascending and non-overlapping.
pub async fn highlight<A, P>(
    source: &str,
    attributes: &A,
    root: &LanguageConfiguration,
    languages: &P,
    context: &RenderingContext,
    options: HighlightOptions,
) -> StyledText
where
    A: AttributeProvider,
    P: LanguageProvider,
{
    if source.is_empty() {
        return StyledText::default();
    }

    let ranges = highlight_layer(
        source,
        attributes,
        root,
        languages,
        context,
        options.max_injection_depth,
    )
    .await;

    StyledText {
        text: source.to_string(),
        ranges,
    }
}

fn highlight_layer<'a>(
    source: &'a str,
    attributes: &'a dyn AttributeProvider,
    config: &'a LanguageConfiguration,
    languages: &'a dyn LanguageProvider,
    context: &'a RenderingContext,
    remaining_depth: u32,
) -> BoxFuture<'a, Vec<StyledRange>> {
    async move {
        let mut tokens = Vec::new();
        let mut regions = Vec::new();
        for event in config.queries().execute(source) {
            match event {
                QueryEvent::Token(token) if token.range.end <= source.len() => tokens.push(token),
                QueryEvent::Nested(region) => regions.push(region),
                QueryEvent::Token(_) => {}
            }
        }

        let nested = if remaining_depth == 0 {
            Vec::new()
        } else {
            let lookups: FuturesUnordered<_> = disjoint_regions(regions, source.len())
                .into_iter()
                .map(move |region| async move {
                    let text = source.get(region.range.clone())?;
                    let doc_type = DocumentType::from_language_hint(&region.hint);
                    let Some(sub) = languages.language_configuration(&doc_type).await else {
                        tracing::debug!(
                            "No configuration for nested region {:?} ({}), keeping base styling",
                            region.range,
                            region.hint
                        );
                        return None;
                    };

                    let masked = mask(text, region.range.start, &region.excluded);
                    let ranges = highlight_layer(
                        masked.as_deref().unwrap_or(text),
                        attributes,
                        &sub,
                        languages,
                        context,
                        remaining_depth - 1,
                    )
                    .await;
                    let ranges = clip_out(shift(ranges, region.range.start), &region.excluded);
                    Some((region.covered(), ranges))
                })
                .collect();
            // Completion order varies; regions are disjoint, so start order is stable
            let mut done: Vec<_> = lookups
                .filter_map(|resolved| async move { resolved })
                .collect()
                .await;
            done.sort_by_key(|(covered, _)| covered.first().map(|piece| piece.start));
            done
        };

        let holes: Vec<Range<usize>> = nested
            .iter()
            .flat_map(|(covered, _)| covered.iter().cloned())
            .collect();
        tokens.retain(|token| !holes.iter().any(|hole| contains(hole, &token.range)));

        let mut styles: Vec<Option<Style>> = vec![None; tokens.len()];
        let base: Vec<StyledRange> = flatten(&tokens)
            .into_iter()
            .map(|(range, idx)| {
                let token = &tokens[idx];
                let style = styles[idx]
                    .get_or_insert_with(|| attributes.style(token, context))
                    .clone();
                StyledRange {
                    range,
                    capture: token.name.clone(),
                    style,
                }
            })
            .collect();

        let mut merged = clip_out(base, &holes);
        merged.extend(nested.into_iter().flat_map(|(_, ranges)| ranges));
        merged.sort_by_key(|styled| styled.range.start);
        merged
    }
    .boxed()
}

/// Drop empty or out-of-bounds regions and regions overlapping an earlier one
fn disjoint_regions(mut regions: Vec<NestedRegion>, len: usize) -> Vec<NestedRegion> {
    regions.sort_by_key(|region| region.range.start);

    let mut kept: Vec<NestedRegion> = Vec::with_capacity(regions.len());
    for region in regions {
        if region.range.is_empty() || region.range.end > len {
            continue;
        }
        if kept
            .last()
            .is_some_and(|last| region.range.start < last.range.end)
        {
            continue;
        }
        kept.push(region);
    }
    kept
}

/// Split overlapping tokens into non-overlapping segments
///
/// Each segment belongs to the deepest token covering it; ties go to the token
/// reported first. Returns `(segment, token index)` in ascending order.
fn flatten(tokens: &[Token]) -> Vec<(Range<usize>, usize)> {
    let mut bounds: Vec<usize> = tokens
        .iter()
        .filter(|token| !token.range.is_empty())
        .flat_map(|token| [token.range.start, token.range.end])
        .collect();
    bounds.sort_unstable();
    bounds.dedup();

    let mut order: Vec<usize> = (0..tokens.len()).collect();
    order.sort_by_key(|&idx| tokens[idx].range.start);

    let mut next = 0;
    let mut active: Vec<usize> = Vec::new();
    let mut segments: Vec<(Range<usize>, usize)> = Vec::new();

    for window in bounds.windows(2) {
        let (start, end) = (window[0], window[1]);

        active.retain(|&idx| tokens[idx].range.end > start);
        while next < order.len() && tokens[order[next]].range.start <= start {
            let idx = order[next];
            if tokens[idx].range.end > start {
                active.push(idx);
            }
            next += 1;
        }

        let winner = active.iter().copied().max_by(|&a, &b| {
            tokens[a]
                .depth
                .cmp(&tokens[b].depth)
                .then_with(|| b.cmp(&a))
        });

        if let Some(idx) = winner {
            match segments.last_mut() {
                Some((range, last)) if *last == idx && range.end == start => range.end = end,
                _ => segments.push((start..end, idx)),
            }
        }
    }

    segments
}

/// Remove the parts of `ranges` covered by `holes` (sorted, disjoint)
fn clip_out(ranges: Vec<StyledRange>, holes: &[Range<usize>]) -> Vec<StyledRange> {
    if holes.is_empty() {
        return ranges;
    }

    let mut out = Vec::with_capacity(ranges.len());
    for styled in ranges {
        let mut start = styled.range.start;
        let end = styled.range.end;

        for hole in holes {
            if hole.end <= start || hole.start >= end {
                continue;
            }
            if hole.start > start {
                out.push(StyledRange {
                    range: start..hole.start,
                    ..styled.clone()
                });
            }
            start = start.max(hole.end);
        }

        if start < end {
            out.push(StyledRange {
                range: start..end,
                ..styled
            });
        }
    }
    out
}

/// Blank the `excluded` spans (absolute offsets) of a region's text,
/// keeping byte offsets and line breaks intact
fn mask(text: &str, offset: usize, excluded: &[Range<usize>]) -> Option<String> {
    if excluded.is_empty() {
        return None;
    }

    let mut bytes = text.as_bytes().to_vec();
    for span in excluded {
        let start = span.start.saturating_sub(offset).min(bytes.len());
        let end = span.end.saturating_sub(offset).min(bytes.len());
        for byte in &mut bytes[start..end] {
            if *byte != b'\n' {
                *byte = b' ';
            }
        }
    }
    String::from_utf8(bytes).ok()
}

fn shift(ranges: Vec<StyledRange>, offset: usize) -> Vec<StyledRange> {
    ranges
        .into_iter()
        .map(|mut styled| {
            styled.range = styled.range.start + offset..styled.range.end + offset;
            styled
        })
        .collect()
}

fn contains(outer: &Range<usize>, inner: &Range<usize>) -> bool {
    outer.start <= inner.start && inner.end <= outer.end
}
