//! End-to-end transform: pixels in, finished artwork out.
//!
//! Everything here runs synchronously. Each stage borrows the previous
//! stage's output and returns a new value; the only mutation is drawing onto
//! the freshly created surface.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::raster::{resample, LuminanceGrid, PixelBuffer};
use crate::render::{write_png, write_svg, Canvas, OutputFormat, Surface, WaveformRenderer};
use crate::types::{Layout, RenderConfig, Squiggle};

/// The result of one full render.
#[derive(Debug, Clone)]
pub struct Artwork {
    pub layout: Layout,
    pub grid: LuminanceGrid,
    pub squiggles: Vec<Squiggle>,
    pub surface: Surface,
    /// Number of stroke segments drawn onto the surface.
    pub segments: usize,
}

impl Artwork {
    /// Write the requested outputs as `<dir>/<stem>.png` and/or `.svg`.
    ///
    /// Returns the written paths.
    pub fn write(&self, dir: &Path, stem: &str, format: OutputFormat, config: &RenderConfig) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        if format.wants_png() {
            let path = dir.join(format!("{}.png", stem));
            write_png(&self.surface, &path)?;
            written.push(path);
        }
        if format.wants_svg() {
            let path = dir.join(format!("{}.svg", stem));
            write_svg(&path, &self.layout, &self.squiggles, config)?;
            written.push(path);
        }
        Ok(written)
    }
}

/// Resample and extract luminance without rendering.
pub fn sample(pixels: &PixelBuffer, config: &RenderConfig) -> Result<(Layout, LuminanceGrid)> {
    let layout = Layout::for_source(pixels.width(), pixels.height(), config)?;
    let sampled = resample(pixels, layout.columns, layout.rows)?;
    Ok((layout, LuminanceGrid::from_pixels(&sampled)))
}

/// Render decoded pixels into a new artwork.
///
/// Fails before any drawing happens if the config or dimensions are invalid,
/// including outputs too large to allocate at the requested scale.
#[tracing::instrument(skip_all, fields(source = ?pixels.size(), scale = scale))]
pub fn render(pixels: &PixelBuffer, config: &RenderConfig, scale: u32) -> Result<Artwork> {
    config.validate()?;
    let (layout, grid) = sample(pixels, config)?;

    let renderer = WaveformRenderer::new(config);
    let squiggles = renderer.squiggles(&grid, &layout);

    let mut canvas = Canvas::new(
        layout.display_width,
        layout.display_height,
        scale,
        config.background,
    )?;
    canvas.draw_backdrop(pixels, config.backdrop_opacity)?;
    let segments = renderer.draw(&squiggles, &mut canvas);
    let surface = canvas.finish();

    info!(
        width = layout.display_width,
        height = layout.display_height,
        rows = squiggles.len(),
        segments,
        "rendered artwork"
    );

    Ok(Artwork {
        layout,
        grid,
        squiggles,
        surface,
        segments,
    })
}
