//! Document type descriptors
//!
//! A document type is an opaque, reverse-DNS style identifier. Declared types
//! carry a conformance relation (a type may refine a more general one), plus
//! the file extensions, MIME types and embedded-language hints that map to them.
//! Undeclared identifiers are valid descriptors too; they conform only to
//! themselves and resolve to the generic profile.

use std::borrow::Cow;
use std::fmt;
use std::path::Path;

use super::languages::RootLanguage;

/// Caller-supplied classification of a document's content
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentType(Cow<'static, str>);

/// Static declaration of a known document type
struct TypeDeclaration {
    identifier: &'static str,
    conforms_to: &'static [&'static str],
    extensions: &'static [&'static str],
    mime_types: &'static [&'static str],
    /// Extra embedded-language names (beyond the root language raw values)
    hints: &'static [&'static str],
}

const DECLARATIONS: &[TypeDeclaration] = &[
    TypeDeclaration {
        identifier: "public.text",
        conforms_to: &[],
        extensions: &[],
        mime_types: &[],
        hints: &[],
    },
    TypeDeclaration {
        identifier: "public.plain-text",
        conforms_to: &["public.text"],
        extensions: &["txt", "text"],
        mime_types: &["text/plain"],
        hints: &["text", "plaintext"],
    },
    TypeDeclaration {
        identifier: "public.source-code",
        conforms_to: &["public.plain-text"],
        extensions: &[],
        mime_types: &[],
        hints: &[],
    },
    TypeDeclaration {
        identifier: "net.daringfireball.markdown",
        conforms_to: &["public.plain-text"],
        extensions: &["md", "markdown", "mdown"],
        mime_types: &["text/markdown", "text/x-markdown"],
        hints: &["md"],
    },
    // Inline content of a markdown document. Not a refinement of markdown
    // itself: block documents must never resolve to the inline grammar.
    TypeDeclaration {
        identifier: "org.tree-sitter.markdown-inline",
        conforms_to: &["public.text"],
        extensions: &[],
        mime_types: &[],
        hints: &["markdown_inline"],
    },
    TypeDeclaration {
        identifier: "org.ocaml.ocaml-interface",
        conforms_to: &["public.source-code"],
        extensions: &["mli"],
        mime_types: &[],
        hints: &["ocaml_interface", "mli"],
    },
    TypeDeclaration {
        identifier: "org.ocaml.ocaml-source",
        conforms_to: &["public.source-code"],
        extensions: &["ml"],
        mime_types: &["text/x-ocaml"],
        hints: &["ml"],
    },
    TypeDeclaration {
        identifier: "public.swift-source",
        conforms_to: &["public.source-code"],
        extensions: &["swift"],
        mime_types: &["text/x-swift"],
        hints: &[],
    },
    TypeDeclaration {
        identifier: "org.golang.go-source",
        conforms_to: &["public.source-code"],
        extensions: &["go"],
        mime_types: &["text/x-go"],
        hints: &["golang"],
    },
];

impl DocumentType {
    pub const TEXT: DocumentType = DocumentType::declared("public.text");
    pub const PLAIN_TEXT: DocumentType = DocumentType::declared("public.plain-text");
    pub const SOURCE_CODE: DocumentType = DocumentType::declared("public.source-code");
    pub const MARKDOWN: DocumentType = DocumentType::declared("net.daringfireball.markdown");
    pub const MARKDOWN_INLINE: DocumentType =
        DocumentType::declared("org.tree-sitter.markdown-inline");
    pub const OCAML_INTERFACE: DocumentType = DocumentType::declared("org.ocaml.ocaml-interface");
    pub const OCAML_SOURCE: DocumentType = DocumentType::declared("org.ocaml.ocaml-source");
    pub const SWIFT_SOURCE: DocumentType = DocumentType::declared("public.swift-source");
    pub const GO_SOURCE: DocumentType = DocumentType::declared("org.golang.go-source");

    const fn declared(identifier: &'static str) -> Self {
        DocumentType(Cow::Borrowed(identifier))
    }

    /// Create a descriptor from an arbitrary identifier
    ///
    /// Identifiers are case-insensitive; they are stored lowercased.
    pub fn new(identifier: impl AsRef<str>) -> Self {
        let normalized = identifier.as_ref().trim().to_lowercase();
        match declaration(&normalized) {
            Some(decl) => DocumentType::declared(decl.identifier),
            None => DocumentType(Cow::Owned(normalized)),
        }
    }

    /// The identifier string (also the cache key for loaded configurations)
    pub fn identifier(&self) -> &str {
        &self.0
    }

    /// Whether this type is declared in the type table
    pub fn is_declared(&self) -> bool {
        declaration(self.identifier()).is_some()
    }

    /// Conformance is reflexive and transitive over the declared parents
    pub fn conforms_to(&self, other: &DocumentType) -> bool {
        conforms(self.identifier(), other.identifier())
    }

    /// Identifiers of the declared parents of this type
    pub fn supertypes(&self) -> &'static [&'static str] {
        declaration(self.identifier())
            .map(|decl| decl.conforms_to)
            .unwrap_or(&[])
    }

    /// Look up a declared type by file extension (without the dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_lowercase();
        DECLARATIONS
            .iter()
            .find(|decl| decl.extensions.contains(&ext.as_str()))
            .map(|decl| DocumentType::declared(decl.identifier))
    }

    /// Look up a declared type by file path
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Look up a declared type by MIME type (parameters are ignored)
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_lowercase();
        DECLARATIONS
            .iter()
            .find(|decl| decl.mime_types.contains(&essence.as_str()))
            .map(|decl| DocumentType::declared(decl.identifier))
    }

    /// Map an embedded-language hint (e.g. a fenced code block's info string)
    /// to a document type
    ///
    /// Unknown hints produce an undeclared type, which resolves to the generic
    /// profile.
    pub fn from_language_hint(hint: &str) -> Self {
        let normalized = RootLanguage::normalize(hint.trim());
        if let Some(lang) = RootLanguage::from_raw_value(&normalized) {
            return lang.document_type();
        }

        DECLARATIONS
            .iter()
            .find(|decl| decl.hints.contains(&normalized.as_str()))
            .map(|decl| DocumentType::declared(decl.identifier))
            .unwrap_or_else(|| DocumentType(Cow::Owned(normalized)))
    }

    /// Best-effort interpretation of user input
    ///
    /// Tries, in order: declared identifier, MIME type, file extension,
    /// language name. Anything else becomes an undeclared type.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if let Some(decl) = declaration(&trimmed.to_lowercase()) {
            return DocumentType::declared(decl.identifier);
        }
        if trimmed.contains('/') {
            if let Some(ty) = Self::from_mime(trimmed) {
                return ty;
            }
        }
        if let Some(ty) = Self::from_extension(trimmed) {
            return ty;
        }
        let hinted = Self::from_language_hint(trimmed);
        if hinted.is_declared() {
            return hinted;
        }
        DocumentType::new(trimmed)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

fn declaration(identifier: &str) -> Option<&'static TypeDeclaration> {
    DECLARATIONS.iter().find(|decl| decl.identifier == identifier)
}

fn conforms(identifier: &str, target: &str) -> bool {
    if identifier == target {
        return true;
    }
    match declaration(identifier) {
        Some(decl) => decl
            .conforms_to
            .iter()
            .any(|parent| conforms(parent, target)),
        None => false,
    }
}
