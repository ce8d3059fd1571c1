//! Command-line argument parsing
//!
//! Flags override the matching fields of the config file.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

use crate::config::HueConfig;
use crate::context::{ColorScheme, Contrast, ControlState};
use crate::syntax::DocumentType;

/// Syntax-highlight a file or stdin
#[derive(Parser, Debug)]
#[command(name = "hue", version, about = "Syntax-highlight source text")]
pub struct CliArgs {
    /// File to highlight (reads stdin when omitted)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Document type: identifier, MIME type, extension or language name
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub doc_type: Option<String>,

    /// Theme id
    #[arg(long, value_name = "ID")]
    pub theme: Option<String>,

    #[arg(long, value_enum)]
    pub scheme: Option<ColorScheme>,

    #[arg(long, value_enum)]
    pub contrast: Option<Contrast>,

    /// Control state (inactive and disabled fade colors)
    #[arg(long, value_enum)]
    pub state: Option<ControlState>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Ansi)]
    pub format: OutputFormat,

    /// Levels of embedded languages to highlight (0 disables nesting)
    #[arg(long, value_name = "N")]
    pub max_depth: Option<u32>,

    /// List supported languages and themes, then exit
    #[arg(long)]
    pub list_languages: bool,

    /// More console logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// 24-bit ANSI escape sequences
    Ansi,
    /// Styled ranges as JSON
    Json,
    /// Source text unchanged
    Plain,
}

impl CliArgs {
    /// Apply flag overrides on top of `config`
    pub fn apply_to(&self, config: &mut HueConfig) {
        if let Some(theme) = &self.theme {
            config.theme = theme.clone();
        }
        if let Some(scheme) = self.scheme {
            config.color_scheme = scheme;
        }
        if let Some(contrast) = self.contrast {
            config.contrast = contrast;
        }
        if let Some(state) = self.state {
            config.control_state = state;
        }
        if let Some(depth) = self.max_depth {
            config.max_injection_depth = depth;
        }
    }

    /// Document type from `--type`, else the path's extension, else plain text
    pub fn document_type(&self) -> DocumentType {
        if let Some(doc_type) = &self.doc_type {
            return DocumentType::parse(doc_type);
        }
        self.path
            .as_deref()
            .and_then(DocumentType::from_path)
            .unwrap_or(DocumentType::PLAIN_TEXT)
    }

    pub fn input_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
