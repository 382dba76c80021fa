//! File system scanner for input images.
//!
//! Recursively scans directories for files the decoder accepts
//! (`.png`, `.jpg`, `.jpeg`).

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::raster::is_accepted;

use super::manifest::Manifest;

/// Result of collecting input files.
#[derive(Debug, Default, PartialEq)]
pub struct ScanResult {
    /// Accepted images, in a stable order.
    pub images: Vec<PathBuf>,
    /// Explicitly named files with an unsupported type.
    pub rejected: Vec<PathBuf>,
}

impl ScanResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of files seen.
    pub fn total(&self) -> usize {
        self.images.len() + self.rejected.len()
    }

    /// Check if nothing was found.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Merge another scan result into this one.
    pub fn merge(&mut self, other: ScanResult) {
        self.images.extend(other.images);
        self.rejected.extend(other.rejected);
    }
}

/// Scan a directory for accepted images.
///
/// Files with other extensions are ignored rather than rejected: a directory
/// full of mixed files is not an error.
pub fn scan_directory(root: &Path, manifest: &Manifest) -> ScanResult {
    let mut result = ScanResult::new();

    if !root.exists() {
        return result;
    }

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if entry.file_type().is_dir() || manifest.is_excluded(path) {
            continue;
        }

        if is_accepted(path) {
            result.images.push(path.to_path_buf());
        }
    }

    result
}

/// Collect inputs from a mix of files and directories.
///
/// Directories are scanned; files are kept if accepted and reported as
/// rejected otherwise.
pub fn collect_inputs(paths: &[PathBuf], manifest: &Manifest) -> ScanResult {
    let mut result = ScanResult::new();

    for path in paths {
        if path.is_dir() {
            result.merge(scan_directory(path, manifest));
        } else if is_accepted(path) {
            result.images.push(path.clone());
        } else {
            result.rejected.push(path.clone());
        }
    }

    result
}
