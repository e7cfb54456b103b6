use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::processor::coord::GeoCoordinate;
use crate::processor::exif::extract_gps;

#[derive(Debug, Clone, PartialEq)]
pub struct GeotaggedPhoto {
    pub coordinate: GeoCoordinate,
    pub display_name: String,
    pub file_path: PathBuf,
}

pub enum ScanEvent<'a> {
    Added(&'a GeotaggedPhoto),
    Skipped(&'a Path),
}

/// Lists the JPEG files directly inside `dir`, sorted by file name.
///
/// A missing directory is not an error: photos are optional.
pub fn photo_entries(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        debug!("photo directory '{}' does not exist", dir.display());
        return Vec::new();
    }

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Failed to read entry in '{}': {}", dir.display(), e);
                None
            }
        })
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && is_jpeg(path))
        .collect()
}

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| matches!(ext.to_lowercase().as_str(), "jpg" | "jpeg"))
}

/// Reads the position of a single photo; `None` when it carries no usable GPS tags.
pub fn geotag(path: &Path) -> Option<GeotaggedPhoto> {
    let coordinate = extract_gps(path)?;

    let display_name = path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());

    Some(GeotaggedPhoto {
        coordinate,
        display_name,
        file_path: path.to_path_buf(),
    })
}

/// Geotags already listed `entries` in order, reporting each one to `observer`.
pub fn scan_entries<F>(entries: &[PathBuf], mut observer: F) -> Vec<GeotaggedPhoto>
    where F: FnMut(ScanEvent) {
    let mut photos = Vec::new();

    for path in entries {
        match geotag(path) {
            Some(photo) => {
                observer(ScanEvent::Added(&photo));
                photos.push(photo);
            }
            None => {
                debug!("skipping '{}': no GPS", path.display());
                observer(ScanEvent::Skipped(path));
            }
        }
    }

    photos
}

pub fn scan_photos_with<F>(dir: &Path, observer: F) -> Vec<GeotaggedPhoto>
    where F: FnMut(ScanEvent) {
    scan_entries(&photo_entries(dir), observer)
}

pub fn scan_photos(dir: &Path) -> Vec<GeotaggedPhoto> {
    scan_photos_with(dir, |_| ())
}
