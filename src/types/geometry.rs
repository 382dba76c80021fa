//! Geometry produced by the waveform renderer.

use serde::Serialize;

use crate::error::{Result, SquiggleError};

use super::RenderConfig;

/// Largest display width or height, in display units.
pub const MAX_DISPLAY_SIZE: u32 = u16::MAX as u32;

/// A point in display units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One row's continuous waveform polyline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Squiggle {
    /// Row index, top to bottom.
    pub row: u32,
    /// Polyline vertices, left to right. The first vertex sits on the baseline.
    pub points: Vec<Point>,
}

/// Output geometry derived from the source size and the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub source_width: u32,
    pub source_height: u32,
    pub display_width: u32,
    pub display_height: u32,
    /// Sampled columns per row.
    pub columns: u32,
    /// Sampled rows.
    pub rows: u32,
}

impl Layout {
    /// Compute the layout for a source image, preserving its aspect ratio.
    pub fn for_source(source_width: u32, source_height: u32, config: &RenderConfig) -> Result<Self> {
        if source_width == 0 || source_height == 0 {
            return Err(SquiggleError::dimension(
                source_width,
                source_height,
                "source image is empty",
            ));
        }
        if config.display_width == 0 {
            return Err(SquiggleError::dimension(0, 0, "displayWidth must be non-zero"));
        }

        let scaled = source_height as f64 * config.display_width as f64 / source_width as f64;
        if config.display_width > MAX_DISPLAY_SIZE || scaled.round() > MAX_DISPLAY_SIZE as f64 {
            return Err(SquiggleError::dimension(
                config.display_width,
                scaled.round() as u32,
                format!("display size exceeds {} units", MAX_DISPLAY_SIZE),
            ));
        }
        let display_height = (scaled.round() as u32).max(1);

        Ok(Self {
            source_width,
            source_height,
            display_width: config.display_width,
            display_height,
            columns: config.display_width,
            rows: config.sample_rows,
        })
    }

    /// Height of one row band in display units.
    pub fn row_height(&self) -> f64 {
        if self.rows == 0 {
            return 0.0;
        }
        self.display_height as f64 / self.rows as f64
    }

    /// Horizontal distance between sampled columns in display units.
    pub fn column_pitch(&self) -> f64 {
        if self.columns == 0 {
            return 0.0;
        }
        self.display_width as f64 / self.columns as f64
    }
}
