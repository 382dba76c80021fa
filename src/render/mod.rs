//! Rendering module for squiggle.
//!
//! This module turns luminance grids into waveform strokes and writes the
//! results as PNG or SVG.

mod png;
mod shaping;
mod surface;
mod svg;
mod waveform;

use serde::{Deserialize, Serialize};

pub use png::{encode_png, write_png};
pub use shaping::nested_sine;
pub use surface::{Canvas, Surface, MAX_SURFACE_PIXELS};
pub use svg::{to_svg, write_svg};
pub use waveform::WaveformRenderer;

/// Which files a render produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Raster output only.
    #[default]
    Png,
    /// Vector output only.
    Svg,
    /// Both raster and vector output.
    Both,
}

impl OutputFormat {
    pub fn wants_png(self) -> bool {
        matches!(self, Self::Png | Self::Both)
    }

    pub fn wants_svg(self) -> bool {
        matches!(self, Self::Svg | Self::Both)
    }
}
