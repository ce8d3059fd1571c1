//! Benchmarks for syntax highlighting performance
//!
//! Run with: cargo bench --bench syntax

mod support;

use hue::syntax::{BundleLoader, ConfigurationLoader, DocumentType, LanguageProfile};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

const GO_SAMPLE: &str = include_str!("../samples/syntax/sample.go");
const MARKDOWN_SAMPLE: &str = include_str!("../samples/syntax/sample.md");

const SWIFT_SAMPLE: &str = r#"
import Foundation

struct Greeter {
    let prefix: String

    func greet(_ names: [String]) -> String {
        return "\(prefix), \(names.joined(separator: " and "))!"
    }
}

let greeter = Greeter(prefix: "Hello")
print(greeter.greet(["swift", "world"]))
"#;

const OCAML_SAMPLE: &str = r#"
let rec fib n = if n < 2 then n else fib (n - 1) + fib (n - 2)

type shape = Circle of float | Square of float

let area = function
  | Circle r -> 3.14159 *. r *. r
  | Square s -> s *. s

let () = Printf.printf "%d\n" (fib 10)
"#;

fn sample(lang: &str) -> (&'static str, DocumentType) {
    match lang {
        "go" => (GO_SAMPLE, DocumentType::GO_SOURCE),
        "markdown" => (MARKDOWN_SAMPLE, DocumentType::MARKDOWN),
        "swift" => (SWIFT_SAMPLE, DocumentType::SWIFT_SOURCE),
        "ocaml" => (OCAML_SAMPLE, DocumentType::OCAML_SOURCE),
        _ => panic!("Unknown language"),
    }
}

// ============================================================================
// Full highlight requests against a warm store
// ============================================================================

#[divan::bench(args = ["go", "markdown", "swift", "ocaml"])]
fn highlight_sample(bencher: divan::Bencher, lang: &str) {
    let (source, doc_type) = sample(lang);
    let rt = support::runtime();
    let service = support::warm_service(
        &rt,
        &[
            doc_type.clone(),
            DocumentType::GO_SOURCE,
            DocumentType::MARKDOWN_INLINE,
        ],
    );

    bencher.bench_local(|| {
        let styled = rt.block_on(service.highlight_request(source, &doc_type));
        divan::black_box(styled)
    });
}

#[divan::bench(args = [100, 500, 1000, 5000])]
fn highlight_large_go(bencher: divan::Bencher, lines: usize) {
    let source = support::generate_large_go(lines);
    let rt = support::runtime();
    let service = support::warm_service(&rt, &[DocumentType::GO_SOURCE]);

    bencher.bench_local(|| {
        let styled = rt.block_on(service.highlight_request(&source, &DocumentType::GO_SOURCE));
        divan::black_box(styled)
    });
}

#[divan::bench(args = [1, 10, 50])]
fn highlight_markdown_nested(bencher: divan::Bencher, blocks: usize) {
    let source = support::generate_markdown_with_blocks(blocks);
    let rt = support::runtime();
    let service = support::warm_service(
        &rt,
        &[
            DocumentType::MARKDOWN,
            DocumentType::MARKDOWN_INLINE,
            DocumentType::GO_SOURCE,
        ],
    );

    bencher.bench_local(|| {
        let styled = rt.block_on(service.highlight_request(&source, &DocumentType::MARKDOWN));
        divan::black_box(styled)
    });
}

// ============================================================================
// Configuration construction (query compilation)
// ============================================================================

#[divan::bench(args = ["go", "markdown", "swift", "ocaml"])]
fn construct_configuration(lang: &str) {
    let (_, doc_type) = sample(lang);
    let profile = LanguageProfile::resolve(&doc_type);
    let config = BundleLoader::new(Vec::new()).construct(profile);
    divan::black_box(config.is_ok());
}

// ============================================================================
// Resolution
// ============================================================================

#[divan::bench]
fn resolve_profiles() {
    for input in ["go", "md", "text/x-ocaml", "public.swift-source", "unknown"] {
        let doc_type = DocumentType::parse(divan::black_box(input));
        divan::black_box(LanguageProfile::resolve(&doc_type));
    }
}
