//! Rendering context
//!
//! Presentation state that influences style resolution. A context is fixed for
//! the duration of one highlight invocation.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Interaction state of the control displaying the text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ControlState {
    #[default]
    Active,
    Inactive,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    Light,
    #[default]
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Contrast {
    #[default]
    Standard,
    Increased,
}

/// Appearance variant: color scheme plus contrast level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Variant {
    pub color_scheme: ColorScheme,
    pub contrast: Contrast,
}

impl Variant {
    pub fn new(color_scheme: ColorScheme, contrast: Contrast) -> Self {
        Self {
            color_scheme,
            contrast,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RenderingContext {
    pub control_state: ControlState,
    pub variant: Variant,
}

impl RenderingContext {
    pub fn new(control_state: ControlState, variant: Variant) -> Self {
        Self {
            control_state,
            variant,
        }
    }

    pub fn color_scheme(&self) -> ColorScheme {
        self.variant.color_scheme
    }

    pub fn contrast(&self) -> Contrast {
        self.variant.contrast
    }
}
