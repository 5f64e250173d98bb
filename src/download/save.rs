// src/download/save.rs
// =============================================================================
// Writes a fetched document into the output directory.
//
// The file is named after the last path segment of the URL it was fetched
// from, so "https://host/letters/1996.pdf" lands in "<dir>/1996.pdf".
// Existing files with the same name are overwritten.
//
// .html letters go through their text encoding (see FetchedResource::encoding)
// and are written back out in that same encoding, so a windows-1252 page
// stays windows-1252 on disk. Everything else is written byte for byte.
// =============================================================================

use std::fs;
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::SaveError;
use crate::fetch::FetchedResource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    Text,
    Binary,
}

impl SaveMode {
    pub fn for_url(url: &str) -> Self {
        let path_is_html = match Url::parse(url) {
            Ok(parsed) => parsed.path().ends_with(".html"),
            Err(_) => url.ends_with(".html"),
        };
        if path_is_html {
            SaveMode::Text
        } else {
            SaveMode::Binary
        }
    }
}

/// Last non-empty path segment of `url`, if it is usable as a file name.
pub fn file_name_from_url(url: &str) -> Option<String> {
    let segment = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .map(str::to_string),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .and_then(|path| path.rsplit('/').find(|s| !s.is_empty()))
            .map(str::to_string),
    }?;

    // Never let a segment walk out of the output directory
    if segment == "." || segment == ".." || segment.contains('\\') {
        return None;
    }
    Some(segment)
}

fn encode_text(resource: &FetchedResource) -> Vec<u8> {
    let encoding = resource.encoding();
    let text = resource.text();
    let (bytes, _, unmappable) = encoding.encode(&text);
    if unmappable {
        tracing::warn!(
            "{} has characters that {} cannot hold; they were written as HTML entities",
            resource.url,
            encoding.name()
        );
    }
    bytes.into_owned()
}

pub fn save_document(
    output_dir: &Path,
    url: &str,
    resource: &FetchedResource,
) -> Result<PathBuf, SaveError> {
    let file_name = file_name_from_url(url).ok_or_else(|| SaveError::NoFileName {
        url: url.to_string(),
    })?;
    let path = output_dir.join(file_name);

    let written = match SaveMode::for_url(url) {
        SaveMode::Text => fs::write(&path, encode_text(resource)),
        SaveMode::Binary => fs::write(&path, &resource.bytes),
    };

    written.map_err(|source| SaveError::Io {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}
