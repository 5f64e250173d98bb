// src/links/mod.rs
// =============================================================================
// This module turns HTML into document URLs.
//
// Submodules:
// - html: pulls letter links (.pdf / .html) out of a page
// - resolve: makes links absolute and decides whether a fetched .html page
//   is the letter itself or a small stub that points at the letter
// =============================================================================

mod html;
mod resolve;

pub use html::extract_document_links;
pub use resolve::{LinkResolver, Resolution};
