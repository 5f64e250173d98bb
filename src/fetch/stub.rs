// src/fetch/stub.rs
// In-memory `Fetcher` used by the resolver and pipeline tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{FetchedResource, Fetcher};
use crate::error::FetchError;

#[derive(Default)]
pub struct StubFetcher {
    responses: HashMap<String, (u16, Vec<u8>)>,
    requests: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(url.to_string(), (status, body.into()));
        self
    }

    /// Every URL passed to `fetch`, in call order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn was_requested(&self, url: &str) -> bool {
        self.requests().iter().any(|u| u == url)
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedResource, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());

        match self.responses.get(url) {
            Some((status, body)) if (200..300).contains(status) => Ok(FetchedResource {
                url: url.to_string(),
                bytes: body.clone(),
                charset: None,
            }),
            Some((status, _)) => Err(FetchError::Status {
                url: url.to_string(),
                status: *status,
            }),
            None => Err(FetchError::Connect {
                url: url.to_string(),
                message: "no stubbed response".to_string(),
            }),
        }
    }
}
