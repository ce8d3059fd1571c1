use std::io::{self, IsTerminal, Read, Write};

use anyhow::{Context, Result};
use clap::Parser;

use hue::cli::{CliArgs, OutputFormat};
use hue::config::HueConfig;
use hue::render;
use hue::service::HighlightService;
use hue::syntax::{DocumentType, LanguageProfile, RootLanguage};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    hue::tracing::init(args.verbose);

    if args.list_languages {
        print_languages();
        return Ok(());
    }

    let mut config = HueConfig::load();
    args.apply_to(&mut config);

    let source = read_input(&args)?;
    let doc_type = args.document_type();
    let profile = LanguageProfile::resolve(&doc_type);
    tracing::info!("Highlighting {} as {}", doc_type, profile.name());

    let service = HighlightService::from_config(&config);
    let styled = service
        .highlight_request(&source, &doc_type)
        .await
        .with_context(|| format!("failed to highlight {}", doc_type))?;

    let color = io::stdout().is_terminal() || std::env::var_os("FORCE_COLOR").is_some();
    let output = match args.format {
        OutputFormat::Json => render::to_json(&styled)?,
        OutputFormat::Ansi if color => render::to_ansi(&styled),
        OutputFormat::Ansi | OutputFormat::Plain => render::to_plain(&styled).to_string(),
    };

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn read_input(args: &CliArgs) -> Result<String> {
    match args.input_path() {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("failed to read stdin")?;
            Ok(source)
        }
    }
}

fn print_languages() {
    println!("Languages:");
    for language in RootLanguage::all() {
        println!("  {:<10} {}", language, language.document_type());
    }
    println!("  {:<10} {}", "(embedded)", DocumentType::MARKDOWN_INLINE);

    println!("\nThemes:");
    for theme in hue::theme::list_available_themes() {
        println!("  {:<10} {}", theme.id, theme.name);
    }
}
