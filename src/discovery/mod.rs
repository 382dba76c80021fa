//! Manifest lookup and input discovery.
//!
//! Commands look for a `squiggle.yaml` in the working directory unless a
//! config file is given explicitly, then collect input images from the
//! paths on the command line.

mod manifest;
mod scanner;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, SquiggleError};

pub use manifest::Manifest;
pub use scanner::{collect_inputs, scan_directory, ScanResult};

/// The name of the manifest file.
pub const MANIFEST_FILENAME: &str = "squiggle.yaml";

/// Load the manifest.
///
/// An explicit path must exist. Otherwise `<root>/squiggle.yaml` is used if
/// present and defaults apply if not. Returns the manifest and the file it
/// came from.
pub fn load_manifest(explicit: Option<&Path>, root: &Path) -> Result<(Manifest, Option<PathBuf>)> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(SquiggleError::Config {
                message: format!("Config file not found: {}", path.display()),
                help: Some(format!("Run 'squiggle init' to create a {}", MANIFEST_FILENAME)),
            });
        }
        return Ok((Manifest::load(path)?, Some(path.to_path_buf())));
    }

    let candidate = root.join(MANIFEST_FILENAME);
    if candidate.is_file() {
        debug!(path = %candidate.display(), "using manifest");
        Ok((Manifest::load(&candidate)?, Some(candidate)))
    } else {
        Ok((Manifest::default(), None))
    }
}
