// src/archive/writer.rs
// =============================================================================
// Writes every file under a directory into one flat zip archive.
//
// - The directory is walked recursively
// - Each file is stored at the archive root under its own base name, so
//   "<dir>/a/b/1996.pdf" becomes "1996.pdf" in the zip
// - Files are added in sorted path order so the archive is reproducible
// - If two files share a base name only the first is kept
// - An existing archive at the target path is replaced
// =============================================================================

use std::collections::HashSet;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ArchiveError;

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> ArchiveError + '_ {
    move |source| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Every regular file under `dir`, recursively, in sorted order.
pub fn collect_files(dir: &Path) -> Result<Vec<PathBuf>, ArchiveError> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current).map_err(io_error(&current))? {
            let entry = entry.map_err(io_error(&current))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(io_error(&path))?;

            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Zips `source_dir` into `zip_path` and returns the number of entries.
pub fn create_zip_archive(source_dir: &Path, zip_path: &Path) -> Result<usize, ArchiveError> {
    let file = File::create(zip_path).map_err(io_error(zip_path))?;
    // The archive itself may live inside source_dir; don't zip it into itself
    let archive_itself = fs::canonicalize(zip_path).ok();

    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut used_names = HashSet::new();
    for path in collect_files(source_dir)? {
        if archive_itself.is_some() && fs::canonicalize(&path).ok() == archive_itself {
            continue;
        }

        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => {
                tracing::warn!("skipping {}: file name is not valid UTF-8", path.display());
                continue;
            }
        };

        if !used_names.insert(name.clone()) {
            tracing::warn!(
                "skipping {}: an entry named {} is already in the archive",
                path.display(),
                name
            );
            continue;
        }

        zip.start_file(name.as_str(), options)?;
        let mut source = File::open(&path).map_err(io_error(&path))?;
        io::copy(&mut source, &mut zip).map_err(io_error(&path))?;
        tracing::debug!("added {} to archive", name);
    }

    zip.finish()?;

    tracing::info!(
        "all letters have been downloaded and zipped in {}",
        zip_path.display()
    );
    Ok(used_names.len())
}
