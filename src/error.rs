// src/error.rs
// =============================================================================
// Error types for each stage of a run.
//
// Only `HarvestError` stops a run. Fetch and save errors are caught per
// document by the pipeline and turned into a `Failed` outcome, and an
// `ArchiveError` is logged without failing the process.
// =============================================================================

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("could not connect to {url}: {message}")]
    Connect { url: String, message: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("could not read response body from {url}: {message}")]
    Body { url: String, message: String },
}

impl FetchError {
    /// HTTP status code, for errors that got as far as a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("no file name in URL {url}")]
    NoFileName { url: String },

    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error while archiving {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("invalid site origin '{origin}': {message}")]
    InvalidOrigin { origin: String, message: String },

    #[error("could not create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch the index page: {0}")]
    IndexUnavailable(#[source] FetchError),
}

impl HarvestError {
    /// Process exit code for a run that stopped on this error.
    ///
    /// An unreachable index page ends the run early but is not a crash:
    /// there is simply nothing to download, so the exit is clean. Broken
    /// setup (bad origin, no output directory) exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            HarvestError::IndexUnavailable(_) => 0,
            HarvestError::InvalidOrigin { .. } | HarvestError::OutputDir { .. } => 1,
        }
    }
}
