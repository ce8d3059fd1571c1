//! Tree-sitter query engine
//!
//! Compiles a profile's query bundle against its grammar and turns query
//! matches into [`QueryEvent`]s: highlight captures become tokens, injection
//! matches become nested regions.

use std::fmt;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Parser, Query, QueryCursor, QueryMatch};

use super::bundle::QueryBundle;
use super::highlights::{NestedRegion, QueryEvent, Token};
use super::profile::{Grammar, LanguageProfile};
use crate::error::HighlightError;

/// Compiled queries, ready to run over source text
///
/// Implementations must be deterministic: identical source yields identical
/// events.
pub trait CompiledQueries: Send + Sync {
    /// Run the queries, returning events ordered by start byte
    fn execute(&self, source: &str) -> Vec<QueryEvent>;
}

/// Capture name tree-sitter-md uses to mark nodes that carry no style
const NONE_CAPTURE: &str = "none";

/// Injection capture indices and the query they belong to
struct InjectionQuery {
    query: Query,
    content: Option<u32>,
    language: Option<u32>,
}

impl InjectionQuery {
    fn new(query: Query) -> Self {
        let content = query
            .capture_index_for_name("injection.content")
            .or_else(|| query.capture_index_for_name("content"));
        let language = query
            .capture_index_for_name("injection.language")
            .or_else(|| query.capture_index_for_name("language"));
        Self {
            query,
            content,
            language,
        }
    }

    /// Whether the content's child nodes belong to the injected language too
    fn include_children(&self, query_match: &QueryMatch) -> bool {
        self.query
            .property_settings(query_match.pattern_index)
            .iter()
            .any(|prop| &*prop.key == "injection.include-children")
    }

    /// Language hint for a match: captured node text first, then `#set!`
    fn language_hint(&self, query_match: &QueryMatch, source: &str) -> Option<String> {
        let captured = self.language.and_then(|idx| {
            query_match
                .captures
                .iter()
                .find(|capture| capture.index == idx)
                .and_then(|capture| capture.node.utf8_text(source.as_bytes()).ok())
                .map(|text| text.trim().to_string())
        });

        captured.filter(|hint| !hint.is_empty()).or_else(|| {
            self.query
                .property_settings(query_match.pattern_index)
                .iter()
                .find(|prop| &*prop.key == "injection.language")
                .and_then(|prop| prop.value.as_deref())
                .map(str::to_string)
        })
    }
}

/// [`CompiledQueries`] backed by tree-sitter
pub struct TreeSitterQueries {
    grammar: Grammar,
    language: Language,
    highlights: Query,
    injections: Option<InjectionQuery>,
}

impl TreeSitterQueries {
    /// Compile `bundle` against the profile's grammar
    ///
    /// Fails when the grammar's ABI is incompatible with the linked
    /// tree-sitter runtime or when a query does not compile.
    pub fn compile(
        profile: &LanguageProfile,
        grammar: Grammar,
        bundle: &QueryBundle,
    ) -> Result<Self, HighlightError> {
        let language = grammar.language();

        let mut parser = Parser::new();
        parser.set_language(&language).map_err(|e| {
            HighlightError::unavailable(profile.name(), format!("incompatible grammar: {}", e))
        })?;

        let highlights = Query::new(&language, &bundle.highlights).map_err(|e| {
            HighlightError::unavailable(
                profile.name(),
                format!("highlights query for {} failed to compile: {}", bundle.key, e),
            )
        })?;

        let injections = match bundle.injections.as_deref() {
            Some(source) if !source.trim().is_empty() => {
                let query = Query::new(&language, source).map_err(|e| {
                    HighlightError::unavailable(
                        profile.name(),
                        format!("injections query for {} failed to compile: {}", bundle.key, e),
                    )
                })?;
                Some(InjectionQuery::new(query))
            }
            _ => None,
        };

        tracing::debug!(
            "Compiled {} queries: {} highlight captures, injections: {}",
            grammar.name(),
            highlights.capture_names().len(),
            injections.is_some()
        );

        Ok(Self {
            grammar,
            language,
            highlights,
            injections,
        })
    }

    fn collect_tokens(&self, root: Node, source: &str, events: &mut Vec<QueryEvent>) {
        let names = self.highlights.capture_names();
        let mut cursor = QueryCursor::new();
        let mut captures = cursor.captures(&self.highlights, root, source.as_bytes());

        while let Some((query_match, capture_idx)) = captures.next() {
            let capture = &query_match.captures[*capture_idx];
            let name = names[capture.index as usize];
            if name.starts_with('_') || name == NONE_CAPTURE {
                continue;
            }

            let range = capture.node.byte_range();
            if range.is_empty() {
                continue;
            }

            events.push(QueryEvent::Token(
                Token::new(name, range).with_depth(node_depth(capture.node)),
            ));
        }
    }

    fn collect_regions(&self, root: Node, source: &str, events: &mut Vec<QueryEvent>) {
        let Some(injections) = &self.injections else {
            return;
        };
        let Some(content_idx) = injections.content else {
            return;
        };

        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&injections.query, root, source.as_bytes());

        while let Some(query_match) = matches.next() {
            let Some(hint) = injections.language_hint(query_match, source) else {
                continue;
            };
            let include_children = injections.include_children(query_match);

            for capture in query_match
                .captures
                .iter()
                .filter(|capture| capture.index == content_idx)
            {
                let range = capture.node.byte_range();
                if range.is_empty() {
                    continue;
                }

                let mut region = NestedRegion::new(range, hint.clone());
                if !include_children {
                    let mut walker = capture.node.walk();
                    let children = capture
                        .node
                        .children(&mut walker)
                        .map(|child| child.byte_range())
                        .collect();
                    region = region.with_excluded(children);
                }
                events.push(QueryEvent::Nested(region));
            }
        }
    }
}

impl CompiledQueries for TreeSitterQueries {
    fn execute(&self, source: &str) -> Vec<QueryEvent> {
        if source.is_empty() {
            return Vec::new();
        }

        let mut parser = Parser::new();
        if let Err(e) = parser.set_language(&self.language) {
            tracing::error!("Failed to set {} language: {}", self.grammar.name(), e);
            return Vec::new();
        }
        let Some(tree) = parser.parse(source, None) else {
            tracing::warn!("Parse of {} source produced no tree", self.grammar.name());
            return Vec::new();
        };

        let root = tree.root_node();
        let mut events = Vec::new();
        self.collect_tokens(root, source, &mut events);
        self.collect_regions(root, source, &mut events);

        // Stable: captures keep query order within the same start byte
        events.sort_by_key(QueryEvent::start);
        events
    }
}

impl fmt::Debug for TreeSitterQueries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeSitterQueries")
            .field("grammar", &self.grammar)
            .field("captures", &self.highlights.capture_names().len())
            .field("injections", &self.injections.is_some())
            .finish()
    }
}

fn node_depth(node: Node) -> u32 {
    let mut depth = 0;
    let mut current = node;
    while let Some(parent) = current.parent() {
        depth += 1;
        current = parent;
    }
    depth
}
