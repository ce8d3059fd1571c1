//! hue - language-aware syntax highlighting
//!
//! Resolves a document type to a language profile, loads and caches the
//! profile's compiled queries, and turns source text into styled ranges,
//! recursing into embedded languages.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod context;
pub mod error;
pub mod render;
pub mod service;
pub mod syntax;
pub mod theme;
pub mod tracing;

// Re-export commonly used types
pub use config::HueConfig;
pub use context::RenderingContext;
pub use error::HighlightError;
pub use service::HighlightService;
pub use theme::Theme;
