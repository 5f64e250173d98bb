// src/fetch/http.rs
// =============================================================================
// The real network fetcher.
//
// Key functionality:
// - One GET per URL with a browser-looking User-Agent header
// - Redirects are followed by reqwest (its default policy)
// - Anything that is not a 2xx response becomes a FetchError
// - Transport failures are sorted into timeout / connect / other
//
// No retries and no timeout override: the job is a one-shot batch and a
// failed letter is simply logged and skipped by the caller.
// =============================================================================

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use super::{FetchedResource, Fetcher};
use crate::error::FetchError;

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher whose every request carries `user_agent`.
    pub fn new(user_agent: &str) -> reqwest::Result<Self> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedResource, FetchError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| categorize_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Grab the final URL and charset before .bytes() consumes the response
        let final_url = response.url().to_string();
        let charset = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(charset_from_content_type);

        let bytes = response.bytes().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        tracing::debug!("fetched {} bytes from {}", bytes.len(), final_url);

        Ok(FetchedResource {
            url: final_url,
            bytes: bytes.to_vec(),
            charset,
        })
    }
}

// Pulls the charset parameter out of a Content-Type value
//
//   "text/html; charset=windows-1252" -> Some("windows-1252")
//   "application/pdf"                 -> None
fn charset_from_content_type(value: &str) -> Option<String> {
    value.split(';').skip(1).find_map(|param| {
        let (name, charset) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            Some(charset.trim().trim_matches('"').to_string())
        } else {
            None
        }
    })
}

// Sorts reqwest transport errors into our own variants
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure or refused connection
// - Too many redirects
// - etc.
fn categorize_error(url: &str, error: reqwest::Error) -> FetchError {
    let url = url.to_string();

    if error.is_timeout() {
        FetchError::Timeout { url }
    } else if error.is_connect() {
        FetchError::Connect {
            url,
            message: error.to_string(),
        }
    } else if error.is_redirect() {
        FetchError::Request {
            url,
            message: "too many redirects".to_string(),
        }
    } else {
        FetchError::Request {
            url,
            message: error.to_string(),
        }
    }
}
