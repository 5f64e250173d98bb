// src/download/pipeline.rs
// =============================================================================
// Runs the whole job from index page to zip file.
//
// How it works:
// 1. Make sure the output directory exists (fatal if it can't be created)
// 2. Fetch the index page and pull out letter links (fatal if it fails)
// 3. For each link, one at a time:
//    - resolve it (fetch + "is this a stub page?")
//    - save the letter, or download each letter the stub points at
// 4. Zip the output directory once, at the very end
//
// Every document attempt produces a DocumentOutcome instead of an error, so
// one broken link never stops the others. The caller gets a RunSummary
// with all outcomes and the counts.
// =============================================================================

use std::fs;
use std::path::PathBuf;

use serde::Serialize;

use super::save::save_document;
use crate::archive::create_zip_archive;
use crate::config::Config;
use crate::error::{FetchError, HarvestError};
use crate::fetch::{FetchedResource, Fetcher};
use crate::links::{extract_document_links, LinkResolver, Resolution};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Written to disk at `path`
    Saved {
        path: PathBuf,
        /// Where the server actually served it from, when that differs
        #[serde(skip_serializing_if = "Option::is_none")]
        redirected_to: Option<String>,
    },
    /// Deliberately not downloaded
    Skipped { reason: String },
    /// Fetch or write failed
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentOutcome {
    pub url: String,
    #[serde(flatten)]
    pub status: DocumentStatus,
}

impl DocumentOutcome {
    fn saved(url: &str, path: PathBuf, redirected_to: Option<String>) -> Self {
        Self {
            url: url.to_string(),
            status: DocumentStatus::Saved { path, redirected_to },
        }
    }

    fn skipped(url: &str, reason: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            status: DocumentStatus::Skipped {
                reason: reason.into(),
            },
        }
    }

    fn failed(url: &str, reason: impl ToString) -> Self {
        Self {
            url: url.to_string(),
            status: DocumentStatus::Failed {
                reason: reason.to_string(),
            },
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self.status, DocumentStatus::Saved { .. })
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub outcomes: Vec<DocumentOutcome>,
    /// Set only when the zip was written successfully
    pub archive: Option<PathBuf>,
    pub archived_files: usize,
}

impl RunSummary {
    pub fn saved(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_saved()).count()
    }

    pub fn skipped(&self) -> usize {
        self.count(|status| matches!(status, DocumentStatus::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, DocumentStatus::Failed { .. }))
    }

    pub fn saved_paths(&self) -> Vec<&PathBuf> {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.status {
                DocumentStatus::Saved { path, .. } => Some(path),
                _ => None,
            })
            .collect()
    }

    fn count(&self, pred: impl Fn(&DocumentStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

pub struct Harvester<'a> {
    config: &'a Config,
    fetcher: &'a dyn Fetcher,
    resolver: LinkResolver,
}

impl<'a> Harvester<'a> {
    pub fn new(config: &'a Config, fetcher: &'a dyn Fetcher) -> Result<Self, HarvestError> {
        Ok(Self {
            config,
            fetcher,
            resolver: LinkResolver::from_config(config)?,
        })
    }

    pub async fn run(&self) -> Result<RunSummary, HarvestError> {
        let output_dir = &self.config.output_dir;
        fs::create_dir_all(output_dir).map_err(|source| HarvestError::OutputDir {
            path: output_dir.clone(),
            source,
        })?;
        tracing::debug!("output directory ready: {}", output_dir.display());

        let links = self.fetch_index_links().await?;
        let outcomes = self.download_all(&links).await;
        tracing::debug!("download pass finished");

        let mut summary = RunSummary {
            outcomes,
            ..RunSummary::default()
        };

        match create_zip_archive(output_dir, &self.config.archive_path) {
            Ok(count) => {
                summary.archive = Some(self.config.archive_path.clone());
                summary.archived_files = count;
            }
            Err(e) => {
                tracing::error!(
                    "failed to create archive {}: {}",
                    self.config.archive_path.display(),
                    e
                );
            }
        }

        Ok(summary)
    }

    /// Fetches the index page and returns its raw letter hrefs.
    pub async fn fetch_index_links(&self) -> Result<Vec<String>, HarvestError> {
        let index_url = &self.config.index_url;

        let page = match self.fetcher.fetch(index_url).await {
            Ok(page) => page,
            Err(e) => {
                if e.status() == Some(403) {
                    tracing::error!("access to the index page is forbidden");
                }
                return Err(HarvestError::IndexUnavailable(e));
            }
        };

        let links = extract_document_links(&page.text());
        tracing::info!("found {} letter links on {}", links.len(), index_url);
        tracing::debug!("extracted letter links: {:?}", links);
        Ok(links)
    }

    /// Processes links strictly one after another.
    pub async fn download_all(&self, links: &[String]) -> Vec<DocumentOutcome> {
        let mut outcomes = Vec::new();
        for href in links {
            outcomes.extend(self.process_link(href).await);
        }
        outcomes
    }

    /// Resolves one index link and saves whatever letters it leads to.
    pub async fn process_link(&self, href: &str) -> Vec<DocumentOutcome> {
        let resolution = match self.resolver.resolve(self.fetcher, href).await {
            Ok(resolution) => resolution,
            Err(e) => {
                log_fetch_error(href, &e);
                return vec![DocumentOutcome::failed(&self.resolver.absolute_url(href), e)];
            }
        };

        match resolution {
            Resolution::Document { url, resource } => vec![self.persist(&url, &resource)],
            Resolution::Indirect {
                page_url,
                targets,
                off_origin,
            } => {
                let mut outcomes = Vec::new();

                for url in &off_origin {
                    tracing::warn!("not following {} from {}: different origin", url, page_url);
                    outcomes.push(DocumentOutcome::skipped(url, "link on stub page leaves the site origin"));
                }

                if targets.is_empty() && off_origin.is_empty() {
                    tracing::warn!("stub page {} has no letter links", page_url);
                    outcomes.push(DocumentOutcome::skipped(&page_url, "stub page has no letter links"));
                }

                for url in &targets {
                    // Targets are final documents; they are never resolved again
                    outcomes.push(self.download_target(url).await);
                }

                outcomes
            }
        }
    }

    async fn download_target(&self, url: &str) -> DocumentOutcome {
        match self.fetcher.fetch(url).await {
            Ok(resource) => self.persist(url, &resource),
            Err(e) => {
                log_fetch_error(url, &e);
                DocumentOutcome::failed(url, e)
            }
        }
    }

    fn persist(&self, url: &str, resource: &FetchedResource) -> DocumentOutcome {
        // The file is still named after `url`; the redirect is only recorded
        let redirected_to = (resource.url != url).then(|| resource.url.clone());
        if let Some(target) = &redirected_to {
            tracing::debug!("{} was served from {}", url, target);
        }

        match save_document(&self.config.output_dir, url, resource) {
            Ok(path) => {
                tracing::info!("downloaded and saved {}", path.display());
                DocumentOutcome::saved(url, path, redirected_to)
            }
            Err(e) => {
                tracing::error!("could not save {}: {}", url, e);
                DocumentOutcome::failed(url, e)
            }
        }
    }
}

fn log_fetch_error(link: &str, error: &FetchError) {
    match error {
        FetchError::Status { .. } => tracing::error!("HTTP error while downloading {}: {}", link, error),
        FetchError::Connect { .. } => tracing::error!("connection error while downloading {}: {}", link, error),
        FetchError::Timeout { .. } => tracing::error!("timeout while downloading {}: {}", link, error),
        _ => tracing::error!("request error while downloading {}: {}", link, error),
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why return Vec<DocumentOutcome> instead of Result?
//    - A Result would let the first broken link end the whole run
//    - Outcomes record what happened and let the loop keep going
//
// 2. What is the 'a in Harvester<'a>?
//    - A lifetime: the Harvester borrows the config and fetcher
//    - It can't outlive them, and it never needs to own them
//
// 3. What does #[serde(flatten)] do?
//    - Merges the status fields into the outcome when serialized
//    - {"url": "...", "status": "saved", "path": "..."}
// -----------------------------------------------------------------------------
