//! Image sources and input-boundary filtering.
//!
//! Files are filtered by extension before any decoding happens, so a stray
//! `.txt` never reaches the decoder.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Result, SquiggleError};

/// File extensions accepted at the input boundary.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Where an image comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// The bundled default image.
    Builtin,
    /// A file on disk (picked, dropped or passed on the command line).
    Path(PathBuf),
    /// Encoded bytes already in memory, with the file name if one is known.
    Bytes { name: Option<String>, bytes: Vec<u8> },
}

impl ImageSource {
    /// Convenience constructor for a path source.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Convenience constructor for an in-memory source with a file name.
    pub fn named_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::Bytes {
            name: Some(name.into()),
            bytes,
        }
    }

    /// Reject sources whose name does not carry an accepted extension.
    ///
    /// Nameless byte sources and the builtin image pass; the decoder sniffs
    /// their content instead.
    pub fn check_file_type(&self) -> Result<()> {
        match self {
            Self::Builtin | Self::Bytes { name: None, .. } => Ok(()),
            Self::Path(path) => check_name(&path.display().to_string(), path),
            Self::Bytes {
                name: Some(name), ..
            } => check_name(name, Path::new(name)),
        }
    }

    /// Short label for status output and logs.
    pub fn label(&self) -> String {
        match self {
            Self::Builtin => "builtin".to_string(),
            Self::Path(path) => path.display().to_string(),
            Self::Bytes { name: Some(name), .. } => name.clone(),
            Self::Bytes { name: None, bytes } => format!("<{} bytes>", bytes.len()),
        }
    }

    /// A file stem suitable for naming output files.
    pub fn stem(&self) -> String {
        let name = match self {
            Self::Builtin => return "default".to_string(),
            Self::Path(path) => path.file_stem().and_then(|s| s.to_str()).map(str::to_string),
            Self::Bytes { name, .. } => name
                .as_deref()
                .and_then(|n| Path::new(n).file_stem())
                .and_then(|s| s.to_str())
                .map(str::to_string),
        };
        name.unwrap_or_else(|| "squiggle".to_string())
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Check whether a path has an accepted image extension (case-insensitive).
pub fn is_accepted(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            ACCEPTED_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

fn check_name(label: &str, path: &Path) -> Result<()> {
    if is_accepted(path) {
        Ok(())
    } else {
        Err(SquiggleError::UnsupportedFileType {
            name: label.to_string(),
        })
    }
}
