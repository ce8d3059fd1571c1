//! Language profiles and document type resolution
//!
//! A profile pairs a root language with its compiled grammar and the key of
//! its query bundle. Profiles are static and never change; resolving a
//! document type to a profile is a pure lookup.

use std::fmt;

use tree_sitter_language::LanguageFn;

use super::document_type::DocumentType;
use super::languages::RootLanguage;

/// Handle to a compiled tree-sitter grammar
#[derive(Clone, Copy)]
pub struct Grammar {
    name: &'static str,
    language_fn: LanguageFn,
}

impl Grammar {
    pub const fn new(name: &'static str, language_fn: LanguageFn) -> Self {
        Self { name, language_fn }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Instantiate the tree-sitter language
    pub fn language(&self) -> tree_sitter::Language {
        tree_sitter::Language::new(self.language_fn)
    }
}

impl fmt::Debug for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Grammar").field(&self.name).finish()
    }
}

/// Language tag + grammar handle + display metadata
///
/// The generic profile has neither grammar nor bundle; every other profile has
/// a grammar.
#[derive(Debug, Clone, Copy)]
pub struct LanguageProfile {
    name: &'static str,
    language: Option<RootLanguage>,
    grammar: Option<Grammar>,
    bundle: Option<&'static str>,
}

pub static GO_PROFILE: LanguageProfile = LanguageProfile::rooted(
    RootLanguage::Go,
    Grammar::new("go", tree_sitter_go::LANGUAGE),
    "go",
);

pub static MARKDOWN_PROFILE: LanguageProfile = LanguageProfile::rooted(
    RootLanguage::Markdown,
    Grammar::new("markdown", tree_sitter_md::LANGUAGE),
    "markdown",
);

/// Inline markdown (emphasis, code spans, links) injected into block markdown
pub static MARKDOWN_INLINE_PROFILE: LanguageProfile = LanguageProfile {
    name: "MarkdownInline",
    language: None,
    grammar: Some(Grammar::new("markdown_inline", tree_sitter_md::INLINE_LANGUAGE)),
    bundle: Some("markdown_inline"),
};

pub static OCAML_PROFILE: LanguageProfile = LanguageProfile::rooted(
    RootLanguage::OCaml,
    Grammar::new("ocaml", tree_sitter_ocaml::LANGUAGE_OCAML),
    "ocaml",
);

pub static OCAML_INTERFACE_PROFILE: LanguageProfile = LanguageProfile::rooted(
    RootLanguage::OCaml,
    Grammar::new("ocaml_interface", tree_sitter_ocaml::LANGUAGE_OCAML_INTERFACE),
    "ocaml_interface",
);

pub static SWIFT_PROFILE: LanguageProfile = LanguageProfile::rooted(
    RootLanguage::Swift,
    Grammar::new("swift", tree_sitter_swift::LANGUAGE),
    "swift",
);

pub static GENERIC_PROFILE: LanguageProfile = LanguageProfile {
    name: "generic",
    language: None,
    grammar: None,
    bundle: None,
};

/// Type families checked in order; the first conforming family wins.
/// Markdown block precedes markdown inline, which precedes the source families.
static REGISTRATIONS: [(DocumentType, &LanguageProfile); 6] = [
    (DocumentType::MARKDOWN, &MARKDOWN_PROFILE),
    (DocumentType::MARKDOWN_INLINE, &MARKDOWN_INLINE_PROFILE),
    (DocumentType::OCAML_INTERFACE, &OCAML_INTERFACE_PROFILE),
    (DocumentType::OCAML_SOURCE, &OCAML_PROFILE),
    (DocumentType::SWIFT_SOURCE, &SWIFT_PROFILE),
    (DocumentType::GO_SOURCE, &GO_PROFILE),
];

impl LanguageProfile {
    const fn rooted(language: RootLanguage, grammar: Grammar, bundle: &'static str) -> Self {
        Self {
            name: language.raw_value(),
            language: Some(language),
            grammar: Some(grammar),
            bundle: Some(bundle),
        }
    }

    /// Resolve a document type to its profile
    ///
    /// Total: unsupported types get the generic profile.
    pub fn resolve(doc_type: &DocumentType) -> &'static LanguageProfile {
        REGISTRATIONS
            .iter()
            .find(|(family, _)| doc_type.conforms_to(family))
            .map(|(_, profile)| *profile)
            .unwrap_or(&GENERIC_PROFILE)
    }

    /// Every non-generic profile, in resolution order
    pub fn registered() -> impl Iterator<Item = &'static LanguageProfile> {
        REGISTRATIONS.iter().map(|(_, profile)| *profile)
    }

    pub fn generic() -> &'static LanguageProfile {
        &GENERIC_PROFILE
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Root language, `None` for the generic and injected-only profiles
    pub fn language(&self) -> Option<RootLanguage> {
        self.language
    }

    pub fn grammar(&self) -> Option<Grammar> {
        self.grammar
    }

    /// Key of the query bundle holding this profile's queries
    pub fn bundle(&self) -> Option<&'static str> {
        self.bundle
    }

    pub fn is_generic(&self) -> bool {
        self.grammar.is_none()
    }
}

impl PartialEq for LanguageProfile {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.language == other.language
            && self.bundle == other.bundle
            && self.grammar.map(|g| g.name) == other.grammar.map(|g| g.name)
    }
}

impl Eq for LanguageProfile {}
