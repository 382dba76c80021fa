//! Waveform renderer.
//!
//! Every luminance row becomes one polyline centred in its row band. Column
//! `x` moves the pen to `x + 1`, displaced vertically by
//! `v * rh/2 * amplitudeScale * displacementGain * nested_sine(x * frequency)`.
//! Row bands and column pitch come from the layout.

use tracing::debug;

use crate::raster::LuminanceGrid;
use crate::types::{Layout, Point, RenderConfig, Squiggle};

use super::shaping::nested_sine;
use super::Canvas;

/// Stateless renderer turning luminance rows into squiggles.
pub struct WaveformRenderer<'a> {
    config: &'a RenderConfig,
}

impl<'a> WaveformRenderer<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self { config }
    }

    /// Build the polyline for one row.
    pub fn squiggle(&self, grid: &LuminanceGrid, row: u32, layout: &Layout) -> Squiggle {
        let config = self.config;
        let row_height = layout.row_height();
        let pitch = layout.column_pitch();
        let center_y = row as f64 * row_height + row_height / 2.0;

        let mut points = Vec::with_capacity(grid.width() as usize + 1);
        points.push(Point::new(0.0, center_y));

        for (x, &v) in grid.row(row).iter().enumerate() {
            let amplitude = v * row_height / 2.0 * config.amplitude_scale;
            let theta = x as f64 * config.frequency + config.phase_shift;
            let shaped = nested_sine(theta, config.nesting_depth);
            let dy = amplitude * config.displacement_gain * shaped;
            points.push(Point::new((x + 1) as f64 * pitch, center_y + dy));
        }

        Squiggle { row, points }
    }

    /// Build all row polylines, top to bottom. An empty grid yields none.
    pub fn squiggles(&self, grid: &LuminanceGrid, layout: &Layout) -> Vec<Squiggle> {
        if grid.is_empty() {
            return Vec::new();
        }
        (0..grid.height())
            .map(|row| self.squiggle(grid, row, layout))
            .collect()
    }

    /// Stroke every squiggle onto `canvas`, one path per row.
    ///
    /// Returns the number of line segments drawn.
    pub fn draw(&self, squiggles: &[Squiggle], canvas: &mut Canvas) -> usize {
        let colour = self.config.stroke_colour;
        let width = self.config.stroke_width;
        let drawn: usize = squiggles
            .iter()
            .filter(|s| canvas.stroke_squiggle(s, colour, width))
            .map(|s| s.points.len() - 1)
            .sum();
        debug!(rows = squiggles.len(), segments = drawn, "stroked waveform");
        drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::PixelBuffer;
    use pretty_assertions::assert_eq;

    fn grid_from(values: &[&[u8]]) -> LuminanceGrid {
        let height = values.len() as u32;
        let width = values.first().map_or(0, |r| r.len()) as u32;
        let buffer = PixelBuffer::from_fn(width, height, |x, y| {
            let v = values[y as usize][x as usize];
            [v, v, v, 255]
        });
        LuminanceGrid::from_pixels(&buffer)
    }

    fn layout(width: u32, height: u32, columns: u32, rows: u32) -> Layout {
        Layout {
            source_width: width,
            source_height: height,
            display_width: width,
            display_height: height,
            columns,
            rows,
        }
    }

    #[test]
    fn test_white_row_is_flat_on_baseline() {
        let config = RenderConfig::default();
        let grid = grid_from(&[&[255, 255, 255, 255]]);
        let squiggle = WaveformRenderer::new(&config).squiggle(&grid, 0, &layout(4, 10, 4, 1));

        assert_eq!(squiggle.points.len(), 5);
        assert_eq!(squiggle.points[0], Point::new(0.0, 5.0));
        for (i, p) in squiggle.points.iter().enumerate() {
            assert_eq!(p.x, i as f64);
            assert!((p.y - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_black_row_follows_nested_sine() {
        let config = RenderConfig::default();
        let grid = grid_from(&[&[0, 0, 0], &[0, 0, 0]]);
        let renderer = WaveformRenderer::new(&config);
        let squiggle = renderer.squiggle(&grid, 1, &layout(3, 20, 3, 2));

        // Row 1 of 2 in a 20 unit tall surface: band 10 units, centre at 15.
        let amplitude = 1.0 * 10.0 / 2.0 * 0.9;
        for x in 0..3 {
            let expected = 15.0 + amplitude * 1.8 * nested_sine(x as f64 * config.frequency, 12);
            assert!((squiggle.points[x + 1].y - expected).abs() < 1e-9);
        }
        assert_eq!(squiggle.points[0], Point::new(0.0, 15.0));
    }

    #[test]
    fn test_displacement_bounded_by_amplitude() {
        let config = RenderConfig {
            nesting_depth: 1,
            ..Default::default()
        };
        let grid = grid_from(&[&[0; 64]]);
        let squiggle = WaveformRenderer::new(&config).squiggle(&grid, 0, &layout(64, 40, 64, 1));
        let bound = 40.0 / 2.0 * 0.9 * 1.8;
        assert!(squiggle.points.iter().all(|p| (p.y - 20.0).abs() <= bound + 1e-9));
    }

    #[test]
    fn test_column_pitch_scales_x() {
        let config = RenderConfig::default();
        let grid = grid_from(&[&[128, 128]]);
        let squiggle = WaveformRenderer::new(&config).squiggle(&grid, 0, &layout(10, 10, 2, 1));
        assert_eq!(squiggle.points.last().unwrap().x, 10.0);
        assert_eq!(squiggle.points[1].x, 5.0);
    }

    #[test]
    fn test_rows_are_separate_polylines() {
        let config = RenderConfig::default();
        let grid = grid_from(&[&[0, 50, 100], &[150, 200, 250]]);
        let squiggles = WaveformRenderer::new(&config).squiggles(&grid, &layout(3, 6, 3, 2));

        assert_eq!(squiggles.len(), 2);
        assert_eq!(squiggles[0].row, 0);
        assert_eq!(squiggles[1].row, 1);
        assert!(squiggles.iter().all(|s| s.points.len() == 4));
        assert_eq!(squiggles[1].points[0], Point::new(0.0, 4.5));
    }

    #[test]
    fn test_deterministic() {
        let config = RenderConfig::default();
        let grid = grid_from(&[&[0, 10, 20, 30, 40], &[50, 60, 70, 80, 90]]);
        let renderer = WaveformRenderer::new(&config);
        let l = layout(5, 8, 5, 2);

        assert_eq!(renderer.squiggles(&grid, &l), renderer.squiggles(&grid, &l));
    }

    #[test]
    fn test_draw_counts_segments() {
        let config = RenderConfig::default();
        let grid = grid_from(&[&[0, 0, 0, 0], &[255, 255, 255, 255]]);
        let renderer = WaveformRenderer::new(&config);
        let squiggles = renderer.squiggles(&grid, &layout(4, 8, 4, 2));

        let mut canvas = Canvas::new(4, 8, 1, crate::types::Colour::WHITE).unwrap();
        assert_eq!(renderer.draw(&squiggles, &mut canvas), 8);
    }

    #[test]
    fn test_empty_grid_draws_nothing() {
        let config = RenderConfig::default();
        let renderer = WaveformRenderer::new(&config);
        let empty_rows = LuminanceGrid::from_pixels(&PixelBuffer::filled(4, 0, [0; 4]));
        let empty_cols = LuminanceGrid::from_pixels(&PixelBuffer::filled(0, 4, [0; 4]));

        assert!(renderer.squiggles(&empty_rows, &layout(4, 4, 4, 0)).is_empty());
        assert!(renderer.squiggles(&empty_cols, &layout(4, 4, 0, 4)).is_empty());

        let mut canvas = Canvas::new(4, 4, 1, crate::types::Colour::WHITE).unwrap();
        assert_eq!(renderer.draw(&[], &mut canvas), 0);
    }
}
