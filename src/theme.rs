//! Theme system
//!
//! YAML-based themes mapping capture names to styles, with compile-time
//! embedded themes and user-defined themes from the config directory.
//!
//! Theme loading priority:
//! 1. User config: `~/.config/hue/themes/{id}.yaml`
//! 2. Embedded: Built-in themes compiled into binary
//!
//! Each theme carries a palette per color scheme. Capture lookup is
//! hierarchical: `keyword.control.import` falls back to `keyword.control`,
//! then `keyword`, then the palette's default foreground.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::context::{ColorScheme, Contrast, ControlState, RenderingContext};

// Embed theme YAML files at compile time
pub const DEFAULT_YAML: &str = include_str!("../themes/default.yaml");
pub const GITHUB_YAML: &str = include_str!("../themes/github.yaml");

pub const DEFAULT_THEME_ID: &str = "default";

/// Foreground alpha applied to every style of an inactive control
pub const INACTIVE_ALPHA: u8 = 0xB3;
/// Foreground alpha applied to every style of a disabled control
pub const DISABLED_ALPHA: u8 = 0x80;

/// A built-in theme entry
pub struct BuiltinTheme {
    /// Stable identifier for config (e.g. "default", "github")
    pub id: &'static str,
    /// Embedded YAML content
    pub yaml: &'static str,
}

/// Registry of all built-in themes
pub const BUILTIN_THEMES: &[BuiltinTheme] = &[
    BuiltinTheme {
        id: DEFAULT_THEME_ID,
        yaml: DEFAULT_YAML,
    },
    BuiltinTheme {
        id: "github",
        yaml: GITHUB_YAML,
    },
];

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("failed to read theme file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid color: {0}")]
    InvalidColor(String),
    #[error("theme {0} defines no palette")]
    NoPalette(String),
    #[error("unknown theme id: {0}")]
    UnknownTheme(String),
}

/// Where the theme came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeSource {
    /// User-defined theme in ~/.config/hue/themes/
    User,
    /// Built-in theme embedded in binary
    Builtin,
}

/// Information about an available theme
#[derive(Debug, Clone)]
pub struct ThemeInfo {
    pub id: String,
    /// Display name from YAML (e.g., "GitHub")
    pub name: String,
    pub source: ThemeSource,
}

/// Load a theme from a YAML file
pub fn from_file(path: &Path) -> Result<Theme, ThemeError> {
    let content = std::fs::read_to_string(path).map_err(|source| ThemeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Theme::from_yaml(&content)
}

/// Load theme by id with priority: user → builtin
pub fn load_theme(id: &str) -> Result<Theme, ThemeError> {
    load_theme_from(id, crate::config_paths::themes_dir().as_deref())
}

/// Load theme by id, looking in `user_dir` before the builtins
pub fn load_theme_from(id: &str, user_dir: Option<&Path>) -> Result<Theme, ThemeError> {
    if let Some(user_dir) = user_dir {
        let user_path = user_dir.join(format!("{}.yaml", id));
        if user_path.exists() {
            tracing::info!("Loading user theme from {}", user_path.display());
            return from_file(&user_path);
        }
    }

    tracing::debug!("Loading builtin theme: {}", id);
    Theme::from_builtin(id)
}

/// List all available themes from all sources
///
/// User themes override builtins with the same id.
pub fn list_available_themes() -> Vec<ThemeInfo> {
    let mut themes = Vec::new();
    let mut seen_ids = std::collections::HashSet::new();

    if let Some(user_dir) = crate::config_paths::themes_dir() {
        if let Ok(entries) = std::fs::read_dir(&user_dir) {
            for entry in entries.filter_map(|e| e.ok()) {
                let path = entry.path();
                if path
                    .extension()
                    .is_some_and(|ext| ext == "yaml" || ext == "yml")
                {
                    if let Some(id) = path.file_stem().and_then(|s| s.to_str()) {
                        if seen_ids.insert(id.to_string()) {
                            let name = extract_theme_name(&path).unwrap_or_else(|| id.to_string());
                            themes.push(ThemeInfo {
                                id: id.to_string(),
                                name,
                                source: ThemeSource::User,
                            });
                        }
                    }
                }
            }
        }
    }

    for builtin in BUILTIN_THEMES {
        if seen_ids.insert(builtin.id.to_string()) {
            let name = Theme::from_yaml(builtin.yaml)
                .map(|t| t.name)
                .unwrap_or_else(|_| builtin.id.to_string());
            themes.push(ThemeInfo {
                id: builtin.id.to_string(),
                name,
                source: ThemeSource::Builtin,
            });
        }
    }

    themes
}

/// Extract theme name from YAML file without full parsing
fn extract_theme_name(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    for line in content.lines() {
        let trimmed = line.trim();
        if let Some(value) = trimmed.strip_prefix("name:") {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            return Some(value.to_string());
        }
    }
    None
}

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color from RGB values (alpha defaults to 255)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Return a new color with the specified alpha value
    pub const fn with_alpha(&self, a: u8) -> Self {
        Self {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 0xFF
    }

    /// Parse from "#RRGGBB" or "#RRGGBBAA" hex string
    pub fn from_hex(s: &str) -> Result<Self, ThemeError> {
        let hex = s.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return Err(ThemeError::InvalidColor(s.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ThemeError::InvalidColor(s.to_string()))
        };

        match hex.len() {
            6 => Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Color::rgba(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(ThemeError::InvalidColor(s.to_string())),
        }
    }

    /// "#RRGGBB", or "#RRGGBBAA" when not fully opaque
    pub fn to_hex(&self) -> String {
        if self.is_opaque() {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// A resolved visual attribute set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub underline: bool,
}

impl Style {
    pub fn fg(color: Color) -> Self {
        Self {
            foreground: Some(color),
            ..Self::default()
        }
    }

    /// Fade foreground and background to `alpha`
    fn faded(mut self, alpha: u8) -> Self {
        self.foreground = self.foreground.map(|c| c.with_alpha(alpha));
        self.background = self.background.map(|c| c.with_alpha(alpha));
        self
    }
}

/// Raw theme data as parsed from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeData {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub palettes: PalettesData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PalettesData {
    #[serde(default)]
    pub dark: Option<PaletteData>,
    #[serde(default)]
    pub light: Option<PaletteData>,
}

/// One color scheme's colors (raw strings from YAML)
#[derive(Debug, Clone, Deserialize)]
pub struct PaletteData {
    pub foreground: String,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub syntax: HashMap<String, StyleData>,
    /// Captures restyled when contrast is increased
    #[serde(default)]
    pub increased_contrast: HashMap<String, StyleData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StyleData {
    #[serde(default)]
    pub foreground: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
}

impl StyleData {
    fn resolve(&self) -> Result<Style, ThemeError> {
        Ok(Style {
            foreground: self.foreground.as_deref().map(Color::from_hex).transpose()?,
            background: self.background.as_deref().map(Color::from_hex).transpose()?,
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
        })
    }
}

/// Resolved palette for one color scheme
#[derive(Debug, Clone)]
pub struct Palette {
    pub foreground: Color,
    pub background: Option<Color>,
    syntax: HashMap<String, Style>,
    increased_contrast: HashMap<String, Style>,
}

impl Palette {
    fn from_data(data: &PaletteData) -> Result<Self, ThemeError> {
        let resolve_all = |map: &HashMap<String, StyleData>| {
            map.iter()
                .map(|(capture, style)| Ok((capture.clone(), style.resolve()?)))
                .collect::<Result<HashMap<_, _>, ThemeError>>()
        };

        Ok(Self {
            foreground: Color::from_hex(&data.foreground)?,
            background: data.background.as_deref().map(Color::from_hex).transpose()?,
            syntax: resolve_all(&data.syntax)?,
            increased_contrast: resolve_all(&data.increased_contrast)?,
        })
    }

    /// Most specific style for `capture`, walking up the dotted hierarchy
    fn lookup(&self, capture: &str, contrast: Contrast) -> Option<Style> {
        let mut name = capture;
        loop {
            if contrast == Contrast::Increased {
                if let Some(style) = self.increased_contrast.get(name) {
                    return Some(*style);
                }
            }
            if let Some(style) = self.syntax.get(name) {
                return Some(*style);
            }
            let (parent, _) = name.rsplit_once('.')?;
            name = parent;
        }
    }
}

/// Resolved theme with parsed colors
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    dark: Palette,
    light: Palette,
}

impl Theme {
    /// Load theme from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ThemeError> {
        let data: ThemeData = serde_yaml::from_str(yaml)?;
        Self::from_data(data)
    }

    /// Load a built-in theme by id
    pub fn from_builtin(id: &str) -> Result<Self, ThemeError> {
        let entry = BUILTIN_THEMES
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| ThemeError::UnknownTheme(id.to_string()))?;
        Theme::from_yaml(entry.yaml)
    }

    /// Convert raw theme data to resolved theme
    pub fn from_data(data: ThemeData) -> Result<Self, ThemeError> {
        let dark = data.palettes.dark.as_ref().map(Palette::from_data).transpose()?;
        let light = data.palettes.light.as_ref().map(Palette::from_data).transpose()?;

        // A scheme without its own palette borrows the other one
        let (dark, light) = match (dark, light) {
            (Some(dark), Some(light)) => (dark, light),
            (Some(only), None) | (None, Some(only)) => (only.clone(), only),
            (None, None) => return Err(ThemeError::NoPalette(data.name)),
        };

        Ok(Theme {
            name: data.name,
            dark,
            light,
        })
    }

    pub fn palette(&self, scheme: ColorScheme) -> &Palette {
        match scheme {
            ColorScheme::Dark => &self.dark,
            ColorScheme::Light => &self.light,
        }
    }

    /// Resolve a capture name to a style under `context`
    ///
    /// Total: unknown captures get the palette's default foreground.
    pub fn resolve_style(&self, capture: &str, context: &RenderingContext) -> Style {
        let palette = self.palette(context.color_scheme());
        let mut style = palette
            .lookup(capture, context.contrast())
            .unwrap_or_default();
        if style.foreground.is_none() {
            style.foreground = Some(palette.foreground);
        }

        match context.control_state {
            ControlState::Active => style,
            ControlState::Inactive => style.faded(INACTIVE_ALPHA),
            ControlState::Disabled => style.faded(DISABLED_ALPHA),
        }
    }

    /// Default theme (YAML-backed with Rust fallback)
    pub fn default_theme() -> Self {
        match Theme::from_yaml(DEFAULT_YAML) {
            Ok(theme) => theme,
            Err(e) => {
                tracing::error!("Builtin default theme is invalid: {}", e);
                let palette = Palette {
                    foreground: Color::rgb(0xD4, 0xD4, 0xD4),
                    background: Some(Color::rgb(0x1E, 0x1E, 0x1E)),
                    syntax: HashMap::new(),
                    increased_contrast: HashMap::new(),
                };
                Theme {
                    name: "Default".to_string(),
                    dark: palette.clone(),
                    light: palette,
                }
            }
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Variant;

    const SAMPLE: &str = r##"
version: 1
name: "Sample"
palettes:
  dark:
    foreground: "#D4D4D4"
    background: "#1E1E1E"
    syntax:
      keyword: { foreground: "#569CD6", bold: true }
      keyword.control: { foreground: "#C586C0" }
      comment: { italic: true }
    increased_contrast:
      keyword: { foreground: "#9CDCFE", bold: true }
"##;

    fn ctx(state: ControlState, scheme: ColorScheme, contrast: Contrast) -> RenderingContext {
        RenderingContext::new(state, Variant::new(scheme, contrast))
    }

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_hex("#FF8000").unwrap(), Color::rgb(0xFF, 0x80, 0x00));
        assert_eq!(
            Color::from_hex("11223344").unwrap(),
            Color::rgba(0x11, 0x22, 0x33, 0x44)
        );
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#GG0000").is_err());
        assert!(Color::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_color_to_hex() {
        assert_eq!(Color::rgb(1, 2, 255).to_hex(), "#0102FF");
        assert_eq!(Color::rgba(1, 2, 3, 0x80).to_hex(), "#01020380");
    }

    #[test]
    fn test_builtin_themes_parse() {
        for builtin in BUILTIN_THEMES {
            let theme = Theme::from_yaml(builtin.yaml);
            assert!(theme.is_ok(), "{} failed: {:?}", builtin.id, theme.err());
        }
    }

    #[test]
    fn test_hierarchical_lookup() {
        let theme = Theme::from_yaml(SAMPLE).unwrap();
        let active = RenderingContext::default();

        let import = theme.resolve_style("keyword.control.import", &active);
        assert_eq!(import.foreground, Some(Color::rgb(0xC5, 0x86, 0xC0)));
        assert!(!import.bold);

        let function = theme.resolve_style("keyword.function", &active);
        assert_eq!(function.foreground, Some(Color::rgb(0x56, 0x9C, 0xD6)));
        assert!(function.bold);
    }

    #[test]
    fn test_unknown_capture_gets_default_foreground() {
        let theme = Theme::from_yaml(SAMPLE).unwrap();
        let style = theme.resolve_style("made.up", &RenderingContext::default());
        assert_eq!(style, Style::fg(Color::rgb(0xD4, 0xD4, 0xD4)));
    }

    #[test]
    fn test_style_without_foreground_inherits_palette() {
        let theme = Theme::from_yaml(SAMPLE).unwrap();
        let style = theme.resolve_style("comment", &RenderingContext::default());
        assert!(style.italic);
        assert_eq!(style.foreground, Some(Color::rgb(0xD4, 0xD4, 0xD4)));
    }

    #[test]
    fn test_increased_contrast_override() {
        let theme = Theme::from_yaml(SAMPLE).unwrap();
        let increased = ctx(ControlState::Active, ColorScheme::Dark, Contrast::Increased);

        let keyword = theme.resolve_style("keyword", &increased);
        assert_eq!(keyword.foreground, Some(Color::rgb(0x9C, 0xDC, 0xFE)));

        // The more specific base entry still wins over a less specific override
        let control = theme.resolve_style("keyword.control", &increased);
        assert_eq!(control.foreground, Some(Color::rgb(0xC5, 0x86, 0xC0)));
    }

    #[test]
    fn test_control_state_fades_foreground() {
        let theme = Theme::from_yaml(SAMPLE).unwrap();
        let inactive = ctx(ControlState::Inactive, ColorScheme::Dark, Contrast::Standard);
        let disabled = ctx(ControlState::Disabled, ColorScheme::Dark, Contrast::Standard);

        let style = theme.resolve_style("keyword", &inactive);
        assert_eq!(style.foreground.map(|c| c.a), Some(INACTIVE_ALPHA));
        let style = theme.resolve_style("keyword", &disabled);
        assert_eq!(style.foreground.map(|c| c.a), Some(DISABLED_ALPHA));
    }

    #[test]
    fn test_missing_scheme_falls_back() {
        let theme = Theme::from_yaml(SAMPLE).unwrap();
        let light = ctx(ControlState::Active, ColorScheme::Light, Contrast::Standard);
        let style = theme.resolve_style("keyword", &light);
        assert_eq!(style.foreground, Some(Color::rgb(0x56, 0x9C, 0xD6)));
    }

    #[test]
    fn test_theme_without_palettes_is_rejected() {
        let err = Theme::from_yaml("version: 1\nname: Empty\npalettes: {}\n").unwrap_err();
        assert!(matches!(err, ThemeError::NoPalette(name) if name == "Empty"));
    }

    #[test]
    fn test_unknown_builtin() {
        assert!(matches!(
            Theme::from_builtin("nope"),
            Err(ThemeError::UnknownTheme(_))
        ));
    }

    #[test]
    fn test_user_theme_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("github.yaml"), SAMPLE).unwrap();

        let theme = load_theme_from("github", Some(dir.path())).unwrap();
        assert_eq!(theme.name, "Sample");

        let builtin = load_theme_from("default", Some(dir.path())).unwrap();
        assert_ne!(builtin.name, "Sample");
    }

    #[test]
    fn test_style_serializes_hex() {
        let style = Style {
            foreground: Some(Color::rgb(0xFF, 0, 0)),
            bold: true,
            ..Style::default()
        };
        let json = serde_json::to_string(&style).unwrap();
        assert_eq!(json, r##"{"foreground":"#FF0000","bold":true}"##);
    }
}
