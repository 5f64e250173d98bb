// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (--debug turns on verbose output)
// 3. Run the harvester: index page -> letters -> zip
// 4. Exit with proper code (0 = run completed or index page unavailable,
//    1 = run could not start)
//
// A run "completes" even when some letters fail to download or the zip
// can't be written; those problems are logged and counted in the summary.
// A missing index page stops the run early, logged, with exit code 0.
// Only broken setup (output directory, origin) exits with 1.
// =============================================================================

mod archive;
mod cli;
mod config;
mod download;
mod error;
mod fetch;
mod links;
mod logging;

use anyhow::Result;
use clap::Parser;

use cli::Cli;
use config::Config;
use download::{Harvester, RunSummary};
use fetch::HttpFetcher;

// One request in flight at a time, so a single-threaded runtime is enough
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);

    logging::init(config.debug);
    tracing::info!("starting letter download from {}", config.index_url);

    let fetcher = HttpFetcher::new(&config.user_agent)?;
    let harvester = Harvester::new(&config, &fetcher)?;

    let summary = match harvester.run().await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("{}. Exiting.", e);
            return Ok(e.exit_code());
        }
    };
    report(&summary);

    Ok(0)
}

fn report(summary: &RunSummary) {
    tracing::info!(
        "done: {} saved, {} skipped, {} failed",
        summary.saved(),
        summary.skipped(),
        summary.failed()
    );

    for path in summary.saved_paths() {
        tracing::debug!("saved file: {}", path.display());
    }

    match &summary.archive {
        Some(path) => tracing::debug!("{} files archived in {}", summary.archived_files, path.display()),
        None => tracing::warn!("no archive was written; downloaded files are still on disk"),
    }

    if let Some(json) = summary_json(summary) {
        tracing::debug!("run summary: {}", json);
    }
}

// The JSON dump is debug output only; failing to build it must not turn a
// finished run into a failed one
fn summary_json(summary: &RunSummary) -> Option<String> {
    match serde_json::to_string_pretty(summary) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::warn!("could not serialize run summary: {}", e);
            None
        }
    }
}
