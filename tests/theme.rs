use hue::context::{ColorScheme, Contrast, ControlState, RenderingContext, Variant};
use hue::theme::{
    list_available_themes, Color, Theme, ThemeSource, BUILTIN_THEMES, DEFAULT_YAML, GITHUB_YAML,
};

fn context(scheme: ColorScheme, contrast: Contrast) -> RenderingContext {
    RenderingContext::new(ControlState::Active, Variant::new(scheme, contrast))
}

#[test]
fn test_color_from_hex_6() {
    let color = Color::from_hex("#1E1E1E").unwrap();
    assert_eq!(color, Color::rgb(0x1E, 0x1E, 0x1E));
    assert_eq!(color.a, 255);
}

#[test]
fn test_color_from_hex_8() {
    let color = Color::from_hex("#1E1E1E80").unwrap();
    assert_eq!(color.a, 0x80);
    assert_eq!(color.to_hex(), "#1E1E1E80");
}

#[test]
fn test_default_theme() {
    let theme = Theme::default();
    assert_eq!(theme.name, "Default");
    assert_eq!(
        theme.palette(ColorScheme::Dark).background,
        Some(Color::rgb(0x1E, 0x1E, 0x1E))
    );
}

#[test]
fn test_parse_github() {
    let theme = Theme::from_yaml(GITHUB_YAML).unwrap();
    assert_eq!(theme.name, "GitHub");
    assert_eq!(
        theme.palette(ColorScheme::Light).foreground,
        Color::rgb(0x1F, 0x23, 0x28)
    );
}

#[test]
fn test_builtin_registry_matches_constants() {
    let ids: Vec<_> = BUILTIN_THEMES.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec!["default", "github"]);
    assert_eq!(BUILTIN_THEMES[0].yaml, DEFAULT_YAML);
}

#[test]
fn test_schemes_resolve_differently() {
    let theme = Theme::default();
    let dark = theme.resolve_style("keyword", &context(ColorScheme::Dark, Contrast::Standard));
    let light = theme.resolve_style("keyword", &context(ColorScheme::Light, Contrast::Standard));
    assert_ne!(dark.foreground, light.foreground);
}

#[test]
fn test_increased_contrast_changes_comment() {
    for builtin in BUILTIN_THEMES {
        let theme = Theme::from_yaml(builtin.yaml).unwrap();
        for scheme in [ColorScheme::Dark, ColorScheme::Light] {
            let standard = theme.resolve_style("comment", &context(scheme, Contrast::Standard));
            let increased = theme.resolve_style("comment", &context(scheme, Contrast::Increased));
            assert_ne!(standard, increased, "{} {:?}", builtin.id, scheme);
        }
    }
}

#[test]
fn test_markdown_captures_are_styled() {
    let theme = Theme::default();
    let ctx = RenderingContext::default();
    let title = theme.resolve_style("text.title", &ctx);
    assert!(title.bold);
    let strong = theme.resolve_style("text.strong", &ctx);
    assert!(strong.bold);
    let uri = theme.resolve_style("text.uri", &ctx);
    assert!(uri.underline);
}

#[test]
fn test_list_includes_builtins() {
    let themes = list_available_themes();
    for builtin in BUILTIN_THEMES {
        assert!(themes.iter().any(|t| t.id == builtin.id));
    }
    let builtin_count = themes
        .iter()
        .filter(|t| t.source == ThemeSource::Builtin)
        .count();
    assert!(builtin_count <= BUILTIN_THEMES.len());
}
