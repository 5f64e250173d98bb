// src/links/html.rs
// =============================================================================
// This module extracts letter links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Unlike a general link checker we do not resolve anything here. The raw
// href is returned exactly as written in the page, because the resolver
// needs to see whether it was absolute, root-relative or bare.
// =============================================================================

use scraper::{Html, Selector};

/// Suffixes that mark an href as a letter. Matched case-sensitively
/// against the literal href, not the response content type.
pub const DOCUMENT_SUFFIXES: [&str; 2] = [".pdf", ".html"];

// Extracts every letter link from HTML content
//
// Parameters:
//   html: the HTML content to parse (borrowed as &str)
//
// Returns: raw href values in document order, duplicates kept
//
// Example:
//   html = "<a href='1996.pdf'>1996</a><a href='/about'>About</a>"
//   result = ["1996.pdf"]
pub fn extract_document_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    // "a[href]" is a constant, known-valid selector; a parse failure here
    // would be a programmer error, not a runtime condition
    let selector = Selector::parse("a[href]").unwrap();

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| is_document_link(href))
        .map(str::to_string)
        .collect()
}

pub fn is_document_link(href: &str) -> bool {
    DOCUMENT_SUFFIXES.iter().any(|suffix| href.ends_with(suffix))
}
