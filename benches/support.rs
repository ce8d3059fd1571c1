//! Shared helpers for benchmarks

use std::sync::Arc;

use hue::syntax::{BundleLoader, DocumentType, LanguageStore};
use hue::theme::Theme;
use hue::HighlightService;

/// Single-threaded runtime for driving async entry points
pub fn runtime() -> tokio::runtime::Runtime {
    match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => panic!("failed to build runtime: {}", e),
    }
}

/// A service whose store already holds the configurations for `types`
#[allow(dead_code)]
pub fn warm_service(rt: &tokio::runtime::Runtime, types: &[DocumentType]) -> HighlightService {
    let store = LanguageStore::new(Arc::new(BundleLoader::new(Vec::new())));
    rt.block_on(async {
        for doc_type in types {
            let _ = store.load_language_configuration(doc_type).await;
        }
    });
    HighlightService::new(store, Theme::default())
}

#[allow(dead_code)]
pub fn generate_large_go(lines: usize) -> String {
    let mut source = String::with_capacity(lines * 50);
    source.push_str("package main\n\nimport \"fmt\"\n\n");

    for i in 0..lines / 6 {
        source.push_str(&format!(
            "func handler{}(x int) int {{\n\tresult := x * 2\n\tfmt.Println(\"value:\", result)\n\treturn result\n}}\n\n",
            i
        ));
    }
    source
}

#[allow(dead_code)]
pub fn generate_markdown_with_blocks(blocks: usize) -> String {
    let mut source = String::from("# Notes\n\n");
    for i in 0..blocks {
        source.push_str(&format!(
            "## Step {}\n\nSome *emphasis* and `code`.\n\n```go\nfunc step{}() int {{\n\treturn {}\n}}\n```\n\n",
            i, i, i
        ));
    }
    source
}
