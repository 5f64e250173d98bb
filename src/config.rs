// src/config.rs
// =============================================================================
// Run configuration.
//
// Every URL and path the job touches is gathered into
// one `Config` value, built once in main.rs and handed to each stage.
// Tests use the `with_*` methods (test builds only) to point the pipeline at
// a mock server and a temporary directory instead of the real site.
// =============================================================================

use std::path::PathBuf;

use crate::cli::Cli;

/// Listing page that links to every letter.
pub const DEFAULT_INDEX_URL: &str = "https://www.berkshirehathaway.com/letters/letters.html";

/// Scheme + host of the letters site.
pub const DEFAULT_ORIGIN: &str = "https://www.berkshirehathaway.com";

/// Path segment that bare relative links are resolved under.
pub const DEFAULT_LISTINGS_PATH: &str = "/letters/";

/// `.html` responses smaller than this are treated as stub pages that only
/// link to the real letter.
pub const DEFAULT_INDIRECTION_THRESHOLD: usize = 3072;

pub const DEFAULT_OUTPUT_DIR: &str = "Berkshire_Hathaway_Letters";
pub const DEFAULT_ARCHIVE_PATH: &str = "Berkshire_Hathaway_Letters.zip";

/// Some hosts refuse requests without a browser-looking user agent.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

#[derive(Debug, Clone)]
pub struct Config {
    pub index_url: String,
    pub origin: String,
    pub listings_path: String,
    pub output_dir: PathBuf,
    pub archive_path: PathBuf,
    pub indirection_threshold: usize,
    pub user_agent: String,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index_url: DEFAULT_INDEX_URL.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            listings_path: DEFAULT_LISTINGS_PATH.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            archive_path: PathBuf::from(DEFAULT_ARCHIVE_PATH),
            indirection_threshold: DEFAULT_INDIRECTION_THRESHOLD,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            debug: false,
        }
    }
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            debug: cli.debug,
            ..Self::default()
        }
    }

    /// Points the whole run at another site. The index page is assumed to
    /// live at `<origin><listings_path><index_page>`.
    #[cfg(test)]
    pub fn with_site(mut self, origin: &str, listings_path: &str, index_page: &str) -> Self {
        self.origin = origin.trim_end_matches('/').to_string();
        self.listings_path = listings_path.to_string();
        self.index_url = format!(
            "{}{}{}",
            self.origin,
            normalize_listings_path(listings_path),
            index_page
        );
        self
    }

    #[cfg(test)]
    pub fn with_output(mut self, output_dir: impl Into<PathBuf>, archive_path: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self.archive_path = archive_path.into();
        self
    }
}

/// Makes sure a listings path starts and ends with exactly one '/'.
///
///   "letters"    -> "/letters/"
///   "/letters/"  -> "/letters/"
///   ""           -> "/"
pub fn normalize_listings_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}
