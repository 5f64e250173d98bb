// src/links/resolve.rs
// =============================================================================
// Turns a raw href from the index page into something downloadable.
//
// The letters site publishes two ways:
// - most years link straight to the letter (a .pdf or a full .html page)
// - some early years link to a tiny .html stub whose only job is to link
//   to the real letter, usually a scanned PDF on the same site
//
// `LinkResolver::resolve` fetches the link once and reports which of the
// two it found. For a stub it returns the stub's own letter links, already
// made absolute and filtered to the site origin. Those targets are meant to
// be downloaded as-is: the resolver never looks inside a stub found inside
// a stub, so there is exactly one level of indirection and no recursion.
// =============================================================================

use url::Url;

use super::html::extract_document_links;
use crate::config::{normalize_listings_path, Config};
use crate::error::{FetchError, HarvestError};
use crate::fetch::{FetchedResource, Fetcher};

/// What a link turned out to be once fetched.
#[derive(Debug)]
pub enum Resolution {
    /// The response is the letter itself and can be saved directly
    Document {
        url: String,
        resource: FetchedResource,
    },
    /// The response was a stub page; its body must not be saved
    Indirect {
        page_url: String,
        /// Same-origin letter URLs found on the stub, in page order
        targets: Vec<String>,
        /// Letter URLs on the stub that point at another origin
        off_origin: Vec<String>,
    },
}

#[derive(Debug, Clone)]
pub struct LinkResolver {
    origin: Url,
    // "https://host[:port]" with no trailing slash
    origin_prefix: String,
    // always "/.../" form
    listings_path: String,
    indirection_threshold: usize,
}

impl LinkResolver {
    pub fn new(
        origin: &str,
        listings_path: &str,
        indirection_threshold: usize,
    ) -> Result<Self, HarvestError> {
        let invalid = |message: &str| HarvestError::InvalidOrigin {
            origin: origin.to_string(),
            message: message.to_string(),
        };

        let parsed = Url::parse(origin).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if parsed.host_str().is_none() {
            return Err(invalid("missing host"));
        }

        Ok(Self {
            origin_prefix: parsed.origin().ascii_serialization(),
            origin: parsed,
            listings_path: normalize_listings_path(listings_path),
            indirection_threshold,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        Self::new(
            &config.origin,
            &config.listings_path,
            config.indirection_threshold,
        )
    }

    // Makes an href absolute
    //
    //   "https://other.example/x.pdf" -> unchanged
    //   "/letters/1996.pdf"           -> origin + "/letters/1996.pdf"
    //   "1996.pdf"                    -> origin + listings path + "1996.pdf"
    //
    // The bare case is joined to the listings path, not to the page the
    // link was found on. The site keeps every letter under that one path.
    pub fn absolute_url(&self, href: &str) -> String {
        if href.starts_with("http") {
            href.to_string()
        } else if href.starts_with('/') {
            format!("{}{}", self.origin_prefix, href)
        } else {
            format!("{}{}{}", self.origin_prefix, self.listings_path, href)
        }
    }

    /// True when `url` has the same scheme, host and port as the site.
    pub fn is_same_origin(&self, url: &str) -> bool {
        match Url::parse(url) {
            Ok(parsed) => parsed.origin() == self.origin.origin(),
            Err(_) => false,
        }
    }

    /// A small `.html` response is a stub page, not a letter. The size
    /// cut-off is a heuristic: a real letter under the threshold would be
    /// misread as a stub, so it is configurable.
    pub fn is_indirection(&self, url: &str, resource: &FetchedResource) -> bool {
        let path_is_html = match Url::parse(url) {
            Ok(parsed) => parsed.path().ends_with(".html"),
            Err(_) => url.ends_with(".html"),
        };
        path_is_html && resource.size() < self.indirection_threshold
    }

    /// Fetches `href` once and classifies the response.
    pub async fn resolve(&self, fetcher: &dyn Fetcher, href: &str) -> Result<Resolution, FetchError> {
        let url = self.absolute_url(href);
        let resource = fetcher.fetch(&url).await?;

        if !self.is_indirection(&url, &resource) {
            return Ok(Resolution::Document { url, resource });
        }

        tracing::debug!(
            "{} is a {}-byte stub page, looking for the letter inside",
            url,
            resource.size()
        );

        let (targets, off_origin): (Vec<String>, Vec<String>) =
            extract_document_links(&resource.text())
                .iter()
                .map(|link| self.absolute_url(link))
                .partition(|target| self.is_same_origin(target));

        Ok(Resolution::Indirect {
            page_url: url,
            targets,
            off_origin,
        })
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does resolve() take `&dyn Fetcher` instead of a reqwest Client?
//    - `dyn Fetcher` is a trait object: "anything that can fetch"
//    - In production it is HttpFetcher, in tests an in-memory StubFetcher
//    - The resolver logic is the same either way
//
// 2. What does .partition() do?
//    - Splits an iterator into two collections using a true/false test
//    - Here: same-origin links on the left, everything else on the right
//
// 3. Why compare Url::origin() instead of checking starts_with()?
//    - "https://site.com.evil.example" starts with "https://site.com"
//    - origin() compares scheme, host and port as separate parts
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::stub::StubFetcher;

    const ORIGIN: &str = "https://www.berkshirehathaway.com";

    fn resolver() -> LinkResolver {
        LinkResolver::new(ORIGIN, "/letters/", 3072).unwrap()
    }

    fn page_of_size(size: usize, inner: &str) -> Vec<u8> {
        let mut body = format!("<html><body>{}</body></html>", inner).into_bytes();
        if body.len() < size {
            body.resize(size, b' ');
        }
        body
    }

    #[test]
    fn test_absolute_href_used_verbatim() {
        let url = "http://www.berkshirehathaway.com/letters/1997.html";
        assert_eq!(resolver().absolute_url(url), url);
    }

    #[test]
    fn test_root_relative_href_gets_origin_only() {
        assert_eq!(
            resolver().absolute_url("/1995/1995ltr.pdf"),
            "https://www.berkshirehathaway.com/1995/1995ltr.pdf"
        );
    }

    #[test]
    fn test_bare_href_gets_listings_path() {
        assert_eq!(
            resolver().absolute_url("1996.pdf"),
            "https://www.berkshirehathaway.com/letters/1996.pdf"
        );
    }

    #[test]
    fn test_origin_trailing_slash_and_bare_listings_path() {
        let resolver = LinkResolver::new("https://www.berkshirehathaway.com/", "letters", 3072).unwrap();
        assert_eq!(
            resolver.absolute_url("1996.pdf"),
            "https://www.berkshirehathaway.com/letters/1996.pdf"
        );
    }

    #[test]
    fn test_invalid_origin() {
        assert!(matches!(
            LinkResolver::new("not a url", "/letters/", 3072),
            Err(HarvestError::InvalidOrigin { .. })
        ));
        assert!(LinkResolver::new("ftp://example.com", "/letters/", 3072).is_err());
    }

    #[test]
    fn test_same_origin() {
        let resolver = resolver();
        assert!(resolver.is_same_origin("https://www.berkshirehathaway.com/letters/1995ltr.pdf"));
        assert!(!resolver.is_same_origin("https://evil.example.com/letters/1995ltr.pdf"));
        assert!(!resolver.is_same_origin("http://www.berkshirehathaway.com/letters/1995ltr.pdf"));
        // Origin text appearing in the path is not the origin
        assert!(!resolver.is_same_origin(
            "https://evil.example.com/https://www.berkshirehathaway.com/a.pdf"
        ));
        assert!(!resolver.is_same_origin("garbage"));
    }

    #[test]
    fn test_indirection_threshold_boundary() {
        let resolver = resolver();
        let url = "https://www.berkshirehathaway.com/letters/1995.html";
        let small = FetchedResource { url: url.to_string(), bytes: vec![b' '; 3071], charset: None };
        let exact = FetchedResource { url: url.to_string(), bytes: vec![b' '; 3072], charset: None };

        assert!(resolver.is_indirection(url, &small));
        assert!(!resolver.is_indirection(url, &exact));
    }

    #[test]
    fn test_small_pdf_is_never_indirection() {
        let url = "https://www.berkshirehathaway.com/letters/1996.pdf";
        let tiny = FetchedResource { url: url.to_string(), bytes: vec![0; 10], charset: None };
        assert!(!resolver().is_indirection(url, &tiny));
    }

    #[tokio::test]
    async fn test_resolve_pdf_is_document() {
        let fetcher = StubFetcher::new().with(
            "https://www.berkshirehathaway.com/letters/1996.pdf",
            200,
            b"%PDF".to_vec(),
        );

        match resolver().resolve(&fetcher, "1996.pdf").await.unwrap() {
            Resolution::Document { url, resource } => {
                assert_eq!(url, "https://www.berkshirehathaway.com/letters/1996.pdf");
                assert_eq!(resource.bytes, b"%PDF");
            }
            other => panic!("expected document, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_resolve_large_html_is_document() {
        let url = "https://www.berkshirehathaway.com/letters/1997.html";
        let fetcher = StubFetcher::new().with(url, 200, page_of_size(5000, r#"<a href="x.pdf">x</a>"#));

        let resolution = resolver().resolve(&fetcher, "1997.html").await.unwrap();
        assert!(matches!(resolution, Resolution::Document { .. }));
        // Only the page itself was fetched, no secondary pass
        assert_eq!(fetcher.requests(), vec![url.to_string()]);
    }

    #[tokio::test]
    async fn test_resolve_small_html_is_indirect() {
        let stub = page_of_size(
            1200,
            r#"<a href="1995ltr.pdf">Letter</a>
               <a href="/1995/1995ar.pdf">Report</a>
               <a href="https://elsewhere.example.com/copy.pdf">Mirror</a>
               <a href="/index.htm">Home</a>"#,
        );
        let fetcher = StubFetcher::new().with(
            "https://www.berkshirehathaway.com/letters/1995.html",
            200,
            stub,
        );

        match resolver().resolve(&fetcher, "1995.html").await.unwrap() {
            Resolution::Indirect { page_url, targets, off_origin } => {
                assert_eq!(page_url, "https://www.berkshirehathaway.com/letters/1995.html");
                assert_eq!(
                    targets,
                    vec![
                        "https://www.berkshirehathaway.com/letters/1995ltr.pdf",
                        "https://www.berkshirehathaway.com/1995/1995ar.pdf",
                    ]
                );
                assert_eq!(off_origin, vec!["https://elsewhere.example.com/copy.pdf"]);
            }
            other => panic!("expected indirect, got {:?}", other),
        }

        // The stub's targets are not fetched by the resolver
        assert_eq!(fetcher.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_threshold_is_configurable() {
        let url = "https://www.berkshirehathaway.com/letters/1997.html";
        let fetcher = StubFetcher::new().with(url, 200, page_of_size(5000, ""));
        let resolver = LinkResolver::new(ORIGIN, "/letters/", 10_000).unwrap();

        let resolution = resolver.resolve(&fetcher, "1997.html").await.unwrap();
        assert!(matches!(resolution, Resolution::Indirect { .. }));
    }

    #[tokio::test]
    async fn test_resolve_propagates_fetch_error() {
        let fetcher = StubFetcher::new().with(
            "https://www.berkshirehathaway.com/letters/1990.pdf",
            404,
            Vec::new(),
        );
        let err = resolver().resolve(&fetcher, "1990.pdf").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }
}
