//! Language profile resolution and highlight dispatch
//!
//! ## Architecture
//!
//! ```text
//! DocumentType → LanguageProfile::resolve → LanguageStore (cached, single-flight)
//!              → LanguageConfiguration (compiled queries)
//!              → pipeline::highlight → StyledText
//!                  ↳ nested regions → LanguageProvider → recurse
//! ```
//!
//! ## Supported Languages
//!
//! - Go
//! - Markdown (block, with inline markdown injected)
//! - OCaml (source and interface)
//! - Swift

mod bundle;
mod configuration;
mod document_type;
mod engine;
mod highlights;
mod languages;
mod pipeline;
mod profile;
mod store;

pub use bundle::{builtin_query, default_search_dirs, QueryBundle, QueryKind, RUNTIME_ENV};
pub use configuration::LanguageConfiguration;
pub use document_type::DocumentType;
pub use engine::{CompiledQueries, TreeSitterQueries};
pub use highlights::{NestedRegion, QueryEvent, StyledRange, StyledText, Token};
pub use languages::{RootLanguage, UnknownLanguage};
pub use pipeline::{
    highlight, AttributeProvider, HighlightOptions, LanguageProvider, DEFAULT_MAX_INJECTION_DEPTH,
};
pub use profile::{Grammar, LanguageProfile};
pub use store::{BundleLoader, ConfigurationLoader, LanguageStore};
