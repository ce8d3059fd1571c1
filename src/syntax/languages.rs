//! Root language registry
//!
//! The closed set of languages a document can be rooted in, with a stable
//! display string and a normalized lookup key for each.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::document_type::DocumentType;

/// Supported root languages
///
/// Adding a language means adding a variant here, one arm in each of
/// `from_raw_value`/`raw_value`/`document_type`, and a profile registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RootLanguage {
    Go,
    Markdown,
    OCaml,
    Swift,
}

/// Returned by [`RootLanguage::from_str`] for names outside the registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown language: {0}")]
pub struct UnknownLanguage(pub String);

impl RootLanguage {
    /// All registered languages, in declaration order
    pub const ALL: [RootLanguage; 4] = [
        RootLanguage::Go,
        RootLanguage::Markdown,
        RootLanguage::OCaml,
        RootLanguage::Swift,
    ];

    pub fn all() -> impl Iterator<Item = RootLanguage> {
        Self::ALL.into_iter()
    }

    /// Lowercase and treat hyphens as underscores ("Objective-C" -> "objective_c")
    pub fn normalize(name: &str) -> String {
        name.to_lowercase().replace('-', "_")
    }

    /// Look up a language by any spelling of its name
    ///
    /// Never fails loudly: unrecognized input is `None`.
    pub fn from_raw_value(raw: &str) -> Option<Self> {
        match Self::normalize(raw.trim()).as_str() {
            "go" => Some(RootLanguage::Go),
            "markdown" => Some(RootLanguage::Markdown),
            "ocaml" => Some(RootLanguage::OCaml),
            "swift" => Some(RootLanguage::Swift),
            _ => None,
        }
    }

    /// Canonical display string
    pub const fn raw_value(self) -> &'static str {
        match self {
            RootLanguage::Go => "Go",
            RootLanguage::Markdown => "Markdown",
            RootLanguage::OCaml => "OCaml",
            RootLanguage::Swift => "Swift",
        }
    }

    /// The document type a document rooted in this language carries
    pub fn document_type(self) -> DocumentType {
        match self {
            RootLanguage::Go => DocumentType::GO_SOURCE,
            RootLanguage::Markdown => DocumentType::MARKDOWN,
            RootLanguage::OCaml => DocumentType::OCAML_SOURCE,
            RootLanguage::Swift => DocumentType::SWIFT_SOURCE,
        }
    }
}

impl fmt::Display for RootLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw_value())
    }
}

impl FromStr for RootLanguage {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_raw_value(s).ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}
