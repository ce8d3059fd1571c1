//! User configuration
//!
//! Stores preferences in `~/.config/hue/config.yaml`. Missing or invalid files
//! fall back to defaults; command-line flags override individual fields.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::context::{ColorScheme, Contrast, ControlState, RenderingContext, Variant};
use crate::syntax::{HighlightOptions, DEFAULT_MAX_INJECTION_DEPTH};
use crate::theme::DEFAULT_THEME_ID;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HueConfig {
    /// Theme id (e.g., "default", "github")
    pub theme: String,
    pub color_scheme: ColorScheme,
    pub contrast: Contrast,
    pub control_state: ControlState,
    /// Levels of embedded languages highlighted; 0 disables nesting
    pub max_injection_depth: u32,
    /// Extra query override directories, searched before the defaults
    pub query_dirs: Vec<PathBuf>,
}

impl Default for HueConfig {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME_ID.to_string(),
            color_scheme: ColorScheme::default(),
            contrast: Contrast::default(),
            control_state: ControlState::default(),
            max_injection_depth: DEFAULT_MAX_INJECTION_DEPTH,
            query_dirs: Vec::new(),
        }
    }
}

impl HueConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    pub fn rendering_context(&self) -> RenderingContext {
        RenderingContext::new(
            self.control_state,
            Variant::new(self.color_scheme, self.contrast),
        )
    }

    pub fn highlight_options(&self) -> HighlightOptions {
        HighlightOptions {
            max_injection_depth: self.max_injection_depth,
        }
    }

    /// Configured query directories followed by the default search dirs
    pub fn query_search_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = self.query_dirs.clone();
        for dir in crate::syntax::default_search_dirs() {
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
        dirs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HueConfig::default();
        assert_eq!(config.theme, "default");
        assert_eq!(config.max_injection_depth, 3);
        assert_eq!(config.rendering_context(), RenderingContext::default());
        assert_eq!(config.highlight_options(), HighlightOptions::default());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = HueConfig::from_yaml("theme: github\ncontrast: increased\n").unwrap();
        assert_eq!(config.theme, "github");
        assert_eq!(config.contrast, Contrast::Increased);
        assert_eq!(config.color_scheme, ColorScheme::Dark);
        assert_eq!(config.max_injection_depth, 3);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(HueConfig::from_yaml("").unwrap(), HueConfig::default());
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        assert!(HueConfig::from_yaml("control_state: sleepy\n").is_err());
    }

    #[test]
    fn test_load_from_invalid_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "max_injection_depth: [not, a, number]\n").unwrap();
        assert_eq!(HueConfig::load_from(&path), HueConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "color_scheme: light\ncontrol_state: inactive\nmax_injection_depth: 1\nquery_dirs: [/tmp/q]\n",
        )
        .unwrap();

        let config = HueConfig::load_from(&path);
        assert_eq!(config.color_scheme, ColorScheme::Light);
        assert_eq!(config.control_state, ControlState::Inactive);
        assert_eq!(config.highlight_options().max_injection_depth, 1);
        assert_eq!(config.query_search_dirs()[0], PathBuf::from("/tmp/q"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = HueConfig::load_from(&dir.path().join("absent.yaml"));
        assert_eq!(config, HueConfig::default());
    }
}
