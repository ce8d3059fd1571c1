//! Highlight data structures
//!
//! Defines query output (tokens and nested regions) and the styled output of
//! a highlight pass.

use std::ops::Range;

use serde::Serialize;

use crate::theme::Style;

/// A named capture produced by executing a highlight query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Capture name (e.g. "keyword", "string.escape")
    pub name: String,
    /// Byte range in the source the query ran over
    pub range: Range<usize>,
    /// Syntax tree depth of the captured node; deeper captures win overlaps
    pub depth: u32,
}

impl Token {
    pub fn new(name: impl Into<String>, range: Range<usize>) -> Self {
        Self {
            name: name.into(),
            range,
            depth: 0,
        }
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }
}

/// A sub-range of source attributed to an embedded language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedRegion {
    pub range: Range<usize>,
    /// Document-type hint, e.g. a fenced code block's info string
    pub hint: String,
    /// Spans inside `range` that stay with the enclosing language, such as
    /// block quote continuation markers. Sorted and disjoint.
    pub excluded: Vec<Range<usize>>,
}

impl NestedRegion {
    pub fn new(range: Range<usize>, hint: impl Into<String>) -> Self {
        Self {
            range,
            hint: hint.into(),
            excluded: Vec::new(),
        }
    }

    /// Keep `excluded` spans with the enclosing language; spans outside
    /// `range` are dropped
    pub fn with_excluded(mut self, mut excluded: Vec<Range<usize>>) -> Self {
        excluded.retain(|span| {
            !span.is_empty() && self.range.start <= span.start && span.end <= self.range.end
        });
        excluded.sort_by_key(|span| span.start);
        excluded.dedup_by(|next, prev| next.start < prev.end);
        self.excluded = excluded;
        self
    }

    /// The parts of `range` handed to the embedded language
    pub fn covered(&self) -> Vec<Range<usize>> {
        let mut pieces = Vec::with_capacity(self.excluded.len() + 1);
        let mut start = self.range.start;
        for span in &self.excluded {
            if span.start > start {
                pieces.push(start..span.start);
            }
            start = start.max(span.end);
        }
        if start < self.range.end {
            pieces.push(start..self.range.end);
        }
        pieces
    }
}

/// One item of query engine output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryEvent {
    Token(Token),
    Nested(NestedRegion),
}

impl QueryEvent {
    pub fn start(&self) -> usize {
        match self {
            QueryEvent::Token(token) => token.range.start,
            QueryEvent::Nested(region) => region.range.start,
        }
    }
}

/// A range of output text with its resolved style
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledRange {
    pub range: Range<usize>,
    /// Capture name the style was resolved from
    pub capture: String,
    pub style: Style,
}

/// Source text plus ascending, non-overlapping styled ranges
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StyledText {
    pub text: String,
    pub ranges: Vec<StyledRange>,
}

impl StyledText {
    /// Text with no style attributes
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ranges: Vec::new(),
        }
    }

    pub fn is_unstyled(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The styled range covering `offset`, if any
    pub fn range_at(&self, offset: usize) -> Option<&StyledRange> {
        let idx = self
            .ranges
            .partition_point(|styled| styled.range.end <= offset);
        self.ranges
            .get(idx)
            .filter(|styled| styled.range.start <= offset)
    }

    /// Iterate the text as (slice, optional style) runs covering every byte
    pub fn runs(&self) -> impl Iterator<Item = (&str, Option<&StyledRange>)> + '_ {
        let mut pieces = Vec::with_capacity(self.ranges.len() * 2 + 1);
        let mut cursor = 0;
        for styled in &self.ranges {
            if styled.range.start > cursor {
                pieces.push((&self.text[cursor..styled.range.start], None));
            }
            pieces.push((&self.text[styled.range.clone()], Some(styled)));
            cursor = styled.range.end;
        }
        if cursor < self.text.len() {
            pieces.push((&self.text[cursor..], None));
        }
        pieces.into_iter()
    }

    /// Check the ordering invariant: strictly ascending, non-overlapping,
    /// non-empty, and within the text
    pub fn is_well_ordered(&self) -> bool {
        let mut last_end = 0;
        for styled in &self.ranges {
            if styled.range.start < last_end
                || styled.range.start >= styled.range.end
                || styled.range.end > self.text.len()
            {
                return false;
            }
            last_end = styled.range.end;
        }
        true
    }
}
