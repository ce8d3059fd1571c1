//! Caller-facing highlight entry point
//!
//! Ties the store, the pipeline and a theme together under one rendering
//! context.

use std::sync::Arc;

use crate::config::HueConfig;
use crate::context::RenderingContext;
use crate::error::HighlightError;
use crate::syntax::{
    highlight, BundleLoader, DocumentType, HighlightOptions, LanguageStore, StyledText, Token,
};
use crate::theme::{self, Style, Theme};

#[derive(Debug, Clone)]
pub struct HighlightService {
    store: LanguageStore,
    theme: Arc<Theme>,
    context: RenderingContext,
    options: HighlightOptions,
}

impl HighlightService {
    pub fn new(store: LanguageStore, theme: Theme) -> Self {
        Self {
            store,
            theme: Arc::new(theme),
            context: RenderingContext::default(),
            options: HighlightOptions::default(),
        }
    }

    /// Build a service from user configuration
    ///
    /// An unknown theme id falls back to the default theme (logged).
    pub fn from_config(config: &HueConfig) -> Self {
        let theme = match theme::load_theme(&config.theme) {
            Ok(theme) => theme,
            Err(e) => {
                tracing::warn!("Failed to load theme {}: {}, using default", config.theme, e);
                Theme::default()
            }
        };

        let store = if config.query_dirs.is_empty() {
            LanguageStore::global().clone()
        } else {
            LanguageStore::new(Arc::new(BundleLoader::new(config.query_search_dirs())))
        };

        Self::new(store, theme)
            .with_context(config.rendering_context())
            .with_options(config.highlight_options())
    }

    pub fn with_context(mut self, context: RenderingContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_options(mut self, options: HighlightOptions) -> Self {
        self.options = options;
        self
    }

    pub fn store(&self) -> &LanguageStore {
        &self.store
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn context(&self) -> RenderingContext {
        self.context
    }

    /// Highlight `source` as `doc_type`
    ///
    /// Unsupported types yield unstyled text. A supported type whose
    /// configuration cannot be built is an error.
    pub async fn highlight_request(
        &self,
        source: &str,
        doc_type: &DocumentType,
    ) -> Result<StyledText, HighlightError> {
        let Some(config) = self.store.load_language_configuration(doc_type).await? else {
            tracing::debug!("No language profile for {}, returning plain text", doc_type);
            return Ok(StyledText::plain(source));
        };

        let theme = self.theme.clone();
        let attributes = move |token: &Token, context: &RenderingContext| -> Style {
            theme.resolve_style(&token.name, context)
        };

        Ok(highlight(
            source,
            &attributes,
            &config,
            &self.store,
            &self.context,
            self.options,
        )
        .await)
    }
}
