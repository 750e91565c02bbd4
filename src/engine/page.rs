//! Helpers for inspecting generated pages

use regex::Regex;
use std::sync::OnceLock;

static IMG_SRC: OnceLock<Regex> = OnceLock::new();

fn img_src() -> &'static Regex {
    IMG_SRC.get_or_init(|| {
        Regex::new(r#"(?i)<img\b[^>]*?\bsrc\s*=\s*["']([^"']+)["']"#)
            .unwrap_or_else(|e| unreachable!("invalid img pattern: {}", e))
    })
}

/// Distinct image file names referenced by a page, in order of appearance
///
/// Only site-relative sources are returned, reduced to their last path
/// segment, which is the identifier the asset cache is keyed by. Absolute
/// URLs and `data:` URIs are skipped.
pub fn image_sources(html: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for caps in img_src().captures_iter(html) {
        let src = caps[1].trim();
        if src.starts_with("data:") || src.contains("://") || src.starts_with("//") {
            continue;
        }

        let without_query = src.split(['?', '#']).next().unwrap_or_default();
        let name = without_query.rsplit('/').next().unwrap_or_default();
        if name.is_empty() || names.iter().any(|n| n == name) {
            continue;
        }
        names.push(name.to_string());
    }

    names
}
