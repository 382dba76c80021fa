//! Inverted luminance extraction.
//!
//! Dark pixels map to values near 1.0 and bright pixels to values near 0.0,
//! so the value can drive waveform amplitude directly.

use serde::Serialize;

use super::PixelBuffer;

/// Rec. 709 luma weights for R, G and B.
const WEIGHTS: [f64; 3] = [0.2126, 0.7152, 0.0722];

/// Inverted, normalized luminance of one RGB triple. Always in `[0, 1]`.
pub fn inverted_luminance(r: u8, g: u8, b: u8) -> f64 {
    let l = WEIGHTS[0] * r as f64 + WEIGHTS[1] * g as f64 + WEIGHTS[2] * b as f64;
    ((255.0 - l) / 255.0).clamp(0.0, 1.0)
}

/// Rows of inverted luminance values, top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LuminanceGrid {
    width: u32,
    height: u32,
    rows: Vec<Vec<f64>>,
}

impl LuminanceGrid {
    /// Extract the grid from a pixel buffer. Alpha is ignored.
    pub fn from_pixels(buffer: &PixelBuffer) -> Self {
        let rows = (0..buffer.height())
            .map(|y| {
                buffer
                    .row(y)
                    .chunks_exact(4)
                    .map(|p| inverted_luminance(p[0], p[1], p[2]))
                    .collect()
            })
            .collect();

        Self {
            width: buffer.width(),
            height: buffer.height(),
            rows,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check whether the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Get a value, or `None` when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<f64> {
        self.rows.get(y as usize)?.get(x as usize).copied()
    }

    /// One row of values.
    pub fn row(&self, y: u32) -> &[f64] {
        &self.rows[y as usize]
    }

    /// All rows, top to bottom.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Mean value over the whole grid, or 0 for an empty grid.
    pub fn mean(&self) -> f64 {
        let count = self.width as usize * self.height as usize;
        if count == 0 {
            return 0.0;
        }
        self.rows.iter().flatten().sum::<f64>() / count as f64
    }

    /// Smallest and largest value, or `None` for an empty grid.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.rows.iter().flatten().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}
