//! PNG output for rendered surfaces.

use std::io::Cursor;
use std::path::Path;

use image::ImageFormat;

use crate::error::{Result, SquiggleError};

use super::Surface;

/// Write a surface to a PNG file.
pub fn write_png(surface: &Surface, path: &Path) -> Result<()> {
    surface.image().save_with_format(path, ImageFormat::Png).map_err(|e| SquiggleError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write PNG: {}", e),
    })
}

/// Encode a surface as PNG bytes.
pub fn encode_png(surface: &Surface) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    surface
        .image()
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| SquiggleError::Build {
            message: format!("Failed to encode PNG: {}", e),
            help: None,
        })?;
    Ok(buf.into_inner())
}
