//! Query bundles
//!
//! A bundle holds the highlight and injection queries for one profile. Query
//! files are looked up in override directories first
//! (`<dir>/<bundle>/highlights.scm`), then fall back to the queries shipped
//! with the grammar crates.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::HighlightError;

/// Environment variable pointing at a development runtime directory
pub const RUNTIME_ENV: &str = "HUE_RUNTIME";

/// The query files a bundle may contain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Highlights,
    Injections,
}

impl QueryKind {
    pub fn file_name(self) -> &'static str {
        match self {
            QueryKind::Highlights => "highlights.scm",
            QueryKind::Injections => "injections.scm",
        }
    }
}

/// Query sources for one profile, not yet compiled
#[derive(Debug, Clone)]
pub struct QueryBundle {
    pub key: String,
    pub highlights: String,
    pub injections: Option<String>,
}

impl QueryBundle {
    /// Locate the queries for `key`
    ///
    /// A missing highlights query is an error; injections are optional.
    pub fn locate(key: &str, search_dirs: &[PathBuf]) -> Result<Self, HighlightError> {
        let highlights = read_query(key, QueryKind::Highlights, search_dirs)?.ok_or_else(|| {
            HighlightError::unavailable(key, "no highlights query found in bundle")
        })?;
        let injections = read_query(key, QueryKind::Injections, search_dirs)?;

        Ok(Self {
            key: key.to_string(),
            highlights,
            injections,
        })
    }
}

/// Directories searched for query overrides, in priority order:
/// `$HUE_RUNTIME/queries`, then `~/.config/hue/queries`
pub fn default_search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Some(runtime) = std::env::var_os(RUNTIME_ENV) {
        dirs.push(PathBuf::from(runtime).join("queries"));
    }

    if let Some(queries) = crate::config_paths::queries_dir() {
        dirs.push(queries);
    }

    dirs
}

fn read_query(
    key: &str,
    kind: QueryKind,
    search_dirs: &[PathBuf],
) -> Result<Option<String>, HighlightError> {
    for dir in search_dirs {
        let path = dir.join(key).join(kind.file_name());
        if let Some(content) = read_override(key, &path)? {
            tracing::debug!("Using {} override from {}", kind.file_name(), path.display());
            return Ok(Some(content));
        }
    }

    Ok(builtin_query(key, kind).map(str::to_string))
}

fn read_override(key: &str, path: &Path) -> Result<Option<String>, HighlightError> {
    if !path.is_file() {
        return Ok(None);
    }
    std::fs::read_to_string(path).map(Some).map_err(|e| {
        HighlightError::unavailable(key, format!("failed to read {}: {}", path.display(), e))
    })
}

/// Queries shipped with the grammar crates
pub fn builtin_query(key: &str, kind: QueryKind) -> Option<&'static str> {
    match (key, kind) {
        ("go", QueryKind::Highlights) => Some(tree_sitter_go::HIGHLIGHTS_QUERY),
        ("markdown", QueryKind::Highlights) => Some(tree_sitter_md::HIGHLIGHT_QUERY_BLOCK),
        ("markdown", QueryKind::Injections) => Some(tree_sitter_md::INJECTION_QUERY_BLOCK),
        ("markdown_inline", QueryKind::Highlights) => Some(tree_sitter_md::HIGHLIGHT_QUERY_INLINE),
        ("markdown_inline", QueryKind::Injections) => {
            Some(tree_sitter_md::INJECTION_QUERY_INLINE)
        }
        ("ocaml", QueryKind::Highlights) => Some(tree_sitter_ocaml::HIGHLIGHTS_QUERY),
        ("ocaml_interface", QueryKind::Highlights) => Some(ocaml_interface_highlights()),
        ("swift", QueryKind::Highlights) => Some(tree_sitter_swift::HIGHLIGHTS_QUERY),
        _ => None,
    }
}

/// The OCaml highlights query minus the `shebang` node, which the interface
/// grammar does not define
fn ocaml_interface_highlights() -> &'static str {
    static QUERY: OnceLock<String> = OnceLock::new();
    QUERY.get_or_init(|| tree_sitter_ocaml::HIGHLIGHTS_QUERY.replace(" (shebang)", ""))
}
