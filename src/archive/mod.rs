// src/archive/mod.rs
// =============================================================================
// This module bundles the downloaded letters into a single zip file.
//
// Submodules:
// - writer: walks the output directory and writes the archive
// =============================================================================

mod writer;

pub use writer::create_zip_archive;
