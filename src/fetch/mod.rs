// src/fetch/mod.rs
// =============================================================================
// This module gets documents off the network.
//
// Submodules:
// - http: the real fetcher, built on reqwest
// - stub: an in-memory fetcher for tests (compiled only under cfg(test))
//
// Every other stage talks to the network through the `Fetcher` trait, never
// through reqwest directly. That is what lets the resolver and pipeline
// tests run without a network connection.
// =============================================================================

mod http;
#[cfg(test)]
pub mod stub;

use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

use crate::error::FetchError;

pub use http::HttpFetcher;

/// The result of one successful GET.
#[derive(Debug, Clone)]
pub struct FetchedResource {
    /// URL the content actually came from, after any server-side redirects
    pub url: String,
    /// Raw response body
    pub bytes: Vec<u8>,
    /// `charset` parameter of the Content-Type header, if the server sent one
    pub charset: Option<String>,
}

impl FetchedResource {
    /// Number of bytes received.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Encoding the body is written in.
    ///
    /// The declared charset wins when the body actually decodes in it.
    /// Otherwise valid UTF-8 is UTF-8 and anything else is windows-1252,
    /// which is what the site's older hand-written pages use.
    pub fn encoding(&self) -> &'static Encoding {
        self.charset
            .as_deref()
            .and_then(|label| Encoding::for_label(label.trim().as_bytes()))
            .filter(|encoding| {
                encoding
                    .decode_without_bom_handling_and_without_replacement(&self.bytes)
                    .is_some()
            })
            .unwrap_or_else(|| {
                if std::str::from_utf8(&self.bytes).is_ok() {
                    UTF_8
                } else {
                    WINDOWS_1252
                }
            })
    }

    /// Body decoded with `encoding()`. A BOM, if any, is kept as U+FEFF so
    /// the text can be encoded back to the bytes that were received.
    pub fn text(&self) -> String {
        self.encoding()
            .decode_without_bom_handling(&self.bytes)
            .0
            .into_owned()
    }
}

/// One GET per call, no retries. Any non-2xx status is an error.
///
/// `async_trait` is needed because the pipeline holds the fetcher behind a
/// `&dyn Fetcher`.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedResource, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_and_text() {
        let resource = FetchedResource {
            url: "https://example.com/1995.html".to_string(),
            bytes: b"<a href=\"1995ltr.pdf\">1995</a>".to_vec(),
            charset: None,
        };
        assert_eq!(resource.size(), 30);
        assert!(resource.text().contains("1995ltr.pdf"));
    }

    #[test]
    fn test_undeclared_non_utf8_is_windows_1252() {
        let resource = FetchedResource {
            url: "https://example.com/1985.html".to_string(),
            bytes: b"Berkshire\x92s letter".to_vec(),
            charset: None,
        };
        assert_eq!(resource.encoding(), WINDOWS_1252);
        assert_eq!(resource.text(), "Berkshire\u{2019}s letter");
    }

    #[test]
    fn test_declared_charset_is_used() {
        let resource = FetchedResource {
            url: "https://example.com/1985.html".to_string(),
            bytes: b"caf\xe9".to_vec(),
            charset: Some("ISO-8859-1".to_string()),
        };
        assert_eq!(resource.text(), "caf\u{e9}");
    }

    #[test]
    fn test_wrong_declared_charset_falls_back() {
        // Declared UTF-8, but the bytes are not
        let resource = FetchedResource {
            url: "https://example.com/1985.html".to_string(),
            bytes: b"Berkshire\x92s".to_vec(),
            charset: Some("utf-8".to_string()),
        };
        assert_eq!(resource.encoding(), WINDOWS_1252);
        assert!(!resource.text().contains('\u{fffd}'));
    }
}
