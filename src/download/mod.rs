// src/download/mod.rs
// =============================================================================
// This module saves letters to disk and drives a whole run.
//
// Submodules:
// - save: writes one fetched document into the output directory
// - pipeline: index page -> links -> resolve -> save, with per-document
//   outcomes collected into a RunSummary
// =============================================================================

mod pipeline;
mod save;

pub use pipeline::{Harvester, RunSummary};
