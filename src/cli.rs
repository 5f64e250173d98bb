// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// The harvester is a batch job with one knob: --debug. Everything else
// (which site, where files go) lives in `Config` with sensible defaults,
// so there are no subcommands and no positional arguments.
// =============================================================================

use clap::Parser;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "letter-harvester",
    version = "0.1.0",
    about = "Download Berkshire Hathaway shareholder letters and zip them",
    long_about = "letter-harvester reads the public letters index page, follows every \
                  letter link (including the small stub pages some early years use), \
                  saves each document to a local folder and bundles the folder into a zip."
)]
pub struct Cli {
    /// Enable debug mode with verbose output
    ///
    /// This is an optional flag: --debug
    #[arg(long)]
    pub debug: bool,
}
