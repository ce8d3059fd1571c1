//! Output renderings of styled text

use crossterm::style::{Attribute, Color as TermColor, ContentStyle, StyledContent};

use crate::syntax::StyledText;
use crate::theme::{Color, Style};

fn term_color(color: Color) -> TermColor {
    TermColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

fn content_style(style: &Style) -> ContentStyle {
    let mut content = ContentStyle::new();
    content.foreground_color = style.foreground.map(term_color);
    content.background_color = style.background.map(term_color);

    if style.bold {
        content.attributes.set(Attribute::Bold);
    }
    if style.italic {
        content.attributes.set(Attribute::Italic);
    }
    if style.underline {
        content.attributes.set(Attribute::Underlined);
    }
    // Terminals have no alpha; faded colors render dim
    if style.foreground.is_some_and(|c| !c.is_opaque()) {
        content.attributes.set(Attribute::Dim);
    }
    content
}

/// Render with 24-bit ANSI escape sequences
pub fn to_ansi(text: &StyledText) -> String {
    let mut out = String::with_capacity(text.text.len() * 2);
    for (slice, styled) in text.runs() {
        match styled {
            Some(styled) => {
                out.push_str(&StyledContent::new(content_style(&styled.style), slice).to_string())
            }
            None => out.push_str(slice),
        }
    }
    out
}

pub fn to_json(text: &StyledText) -> serde_json::Result<String> {
    serde_json::to_string_pretty(text)
}

pub fn to_plain(text: &StyledText) -> &str {
    &text.text
}
