//! Directory scanning for the working directory.
//!
//! Both scans only look at direct children of the given directory. Entries
//! whose metadata cannot be read are skipped, never fatal.

use std::{
    fs::{self, Metadata},
    io,
    path::Path,
    time::SystemTime,
};

use tracing::{debug, warn};

/// Extensions (lowercase, without the dot) that qualify a file as an image.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "bmp"];

/// Returns true when `name` ends with one of [`IMAGE_EXTENSIONS`], ignoring case.
pub fn is_image_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{ext}")))
}

pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Lists qualifying image files directly under `dir`, sorted by name.
pub fn scan_images(dir: &Path) -> io::Result<Vec<String>> {
    let mut images = Vec::new();

    for entry in fs::read_dir(dir)?.filter_map(|r| r.ok()) {
        let Some(name) = utf8_name(&entry) else {
            continue;
        };
        if !is_image_name(&name) {
            continue;
        }
        match entry.file_type() {
            Ok(kind) if kind.is_dir() => continue,
            Ok(_) => images.push(name),
            Err(err) => warn!("skipping {name}: {err}"),
        }
    }

    images.sort();
    debug!("found {} images in {}", images.len(), dir.display());
    Ok(images)
}

/// Lists non-hidden sub-directories of `dir`, oldest first.
///
/// Ties keep the directory listing order, which the platform does not define.
pub fn scan_folders(dir: &Path) -> io::Result<Vec<String>> {
    let mut folders = Vec::new();

    for entry in fs::read_dir(dir)?.filter_map(|r| r.ok()) {
        let Some(name) = utf8_name(&entry) else {
            continue;
        };
        if is_hidden(&name) {
            continue;
        }
        // follows symlinks, so a link to a directory counts as a folder
        let metadata = match fs::metadata(entry.path()) {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!("skipping {name}: {err}");
                continue;
            }
        };
        if metadata.is_dir() {
            folders.push((name, creation_time(&metadata)));
        }
    }

    folders.sort_by_key(|(_, created)| *created);
    debug!("found {} folders in {}", folders.len(), dir.display());
    Ok(folders.into_iter().map(|(name, _)| name).collect())
}

/// Birth time where the filesystem records one, otherwise the last
/// metadata change.
pub fn creation_time(metadata: &Metadata) -> SystemTime {
    metadata
        .created()
        .unwrap_or_else(|_| metadata_change_time(metadata))
}

#[cfg(unix)]
fn metadata_change_time(metadata: &Metadata) -> SystemTime {
    use std::{os::unix::fs::MetadataExt, time::Duration};

    match (u64::try_from(metadata.ctime()), u32::try_from(metadata.ctime_nsec())) {
        (Ok(secs), Ok(nanos)) => SystemTime::UNIX_EPOCH + Duration::new(secs, nanos),
        _ => SystemTime::UNIX_EPOCH,
    }
}

#[cfg(not(unix))]
fn metadata_change_time(metadata: &Metadata) -> SystemTime {
    metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH)
}

fn utf8_name(entry: &fs::DirEntry) -> Option<String> {
    match entry.file_name().into_string() {
        Ok(name) => Some(name),
        Err(raw) => {
            warn!("skipping non UTF-8 file name {:?}", raw);
            None
        }
    }
}
