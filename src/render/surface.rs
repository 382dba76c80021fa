//! Output raster surface.
//!
//! A [`Canvas`] records drawing at logical size times an integer pixel scale
//! and rasterizes everything with `vello_cpu` in [`Canvas::finish`]. The
//! finished [`Surface`] holds straight-alpha RGBA pixels ready for encoding.

use std::sync::Arc;

use image::{Rgba, RgbaImage};
use vello_cpu::kurbo::{Affine, BezPath, Cap, Join, Rect, Stroke};
use vello_cpu::peniko::color::PremulRgba8;
use vello_cpu::peniko::{Color, ImageQuality, ImageSampler};
use vello_cpu::{Pixmap, RenderContext};

use crate::error::{Result, SquiggleError};
use crate::raster::{resample, PixelBuffer};
use crate::types::{Colour, Point, Squiggle};

/// Largest number of pixels a canvas will allocate.
pub const MAX_SURFACE_PIXELS: u64 = 1 << 26;

/// A drawing target that has not been rasterized yet.
pub struct Canvas {
    ctx: RenderContext,
    width: u32,
    height: u32,
    scale: u32,
    pixel_width: u16,
    pixel_height: u16,
}

impl Canvas {
    /// Create a canvas of `width` x `height` display units filled with
    /// `background`. Pixel dimensions are multiplied by `scale` (minimum 1).
    ///
    /// Fails with `InvalidDimension` for an empty size, or when the scaled
    /// size overflows or exceeds [`MAX_SURFACE_PIXELS`].
    pub fn new(width: u32, height: u32, scale: u32, background: Colour) -> Result<Self> {
        let scale = scale.max(1);
        let (pixel_width, pixel_height) = pixel_size(width, height, scale)?;

        let mut ctx = RenderContext::new(pixel_width, pixel_height);
        if !background.is_transparent() {
            ctx.set_paint(paint(background));
            ctx.fill_rect(&Rect::new(0.0, 0.0, f64::from(pixel_width), f64::from(pixel_height)));
        }

        Ok(Self {
            ctx,
            width,
            height,
            scale,
            pixel_width,
            pixel_height,
        })
    }

    /// Draw `src` stretched over the whole canvas with nearest-neighbour
    /// sampling, composited at `opacity`. Nothing is drawn at zero opacity.
    pub fn draw_backdrop(&mut self, src: &PixelBuffer, opacity: f32) -> Result<()> {
        if src.is_empty() || opacity <= 0.0 {
            return Ok(());
        }

        let limit = u32::from(u16::MAX);
        let fitted;
        let src = if src.width() > limit || src.height() > limit {
            fitted = resample(
                src,
                src.width().min(u32::from(self.pixel_width)),
                src.height().min(u32::from(self.pixel_height)),
            )?;
            &fitted
        } else {
            src
        };

        let image = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(to_pixmap(src)?)),
            sampler: ImageSampler {
                quality: ImageQuality::Low,
                ..ImageSampler::default()
            },
        };
        let (sw, sh) = (f64::from(src.width()), f64::from(src.height()));

        self.ctx.set_transform(Affine::scale_non_uniform(
            f64::from(self.pixel_width) / sw,
            f64::from(self.pixel_height) / sh,
        ));
        self.ctx.set_paint_transform(Affine::IDENTITY);
        self.ctx.set_paint(image);

        let layered = opacity < 1.0;
        if layered {
            self.ctx.push_opacity_layer(opacity);
        }
        self.ctx.fill_rect(&Rect::new(0.0, 0.0, sw, sh));
        if layered {
            self.ctx.pop_layer();
        }
        self.ctx.set_transform(Affine::IDENTITY);
        Ok(())
    }

    /// Stroke a squiggle as one continuous round-joined path.
    ///
    /// Returns false, drawing nothing, for fewer than two points, non-finite
    /// coordinates or a non-positive width.
    pub fn stroke_squiggle(&mut self, squiggle: &Squiggle, colour: Colour, width: f64) -> bool {
        let s = f64::from(self.scale);
        let width = width * s;
        if !(width.is_finite() && width > 0.0) {
            return false;
        }
        let Some(path) = polyline(&squiggle.points, s) else {
            return false;
        };

        self.ctx.set_stroke(Stroke::new(width).with_caps(Cap::Round).with_join(Join::Round));
        self.ctx.set_paint(paint(colour));
        self.ctx.stroke_path(&path);
        true
    }

    /// Rasterize everything drawn so far.
    pub fn finish(mut self) -> Surface {
        let mut pixmap = Pixmap::new(self.pixel_width, self.pixel_height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);

        let (w, h) = (u32::from(self.pixel_width), u32::from(self.pixel_height));
        let data = pixmap.data_as_u8_slice();
        let image = RgbaImage::from_fn(w, h, |x, y| {
            let i = (y as usize * w as usize + x as usize) * 4;
            Rgba(unpremultiply([data[i], data[i + 1], data[i + 2], data[i + 3]]))
        });

        Surface {
            image,
            width: self.width,
            height: self.height,
            scale: self.scale,
        }
    }
}

/// A rasterized image with its logical size and pixel scale.
#[derive(Debug, Clone)]
pub struct Surface {
    image: RgbaImage,
    width: u32,
    height: u32,
    scale: u32,
}

impl Surface {
    /// Size in display units.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Get a pixel, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Colour> {
        self.image.get_pixel_checked(x, y).map(|p| Colour::from_rgba(p.0))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

fn pixel_size(width: u32, height: u32, scale: u32) -> Result<(u16, u16)> {
    if width == 0 || height == 0 {
        return Err(SquiggleError::dimension(width, height, "surface is empty"));
    }

    let too_large = || {
        SquiggleError::dimension(
            width,
            height,
            format!("surface at scale {} exceeds the {} pixel limit", scale, MAX_SURFACE_PIXELS),
        )
    };
    let side = |v: u32| {
        v.checked_mul(scale)
            .and_then(|p| u16::try_from(p).ok())
            .ok_or_else(too_large)
    };
    let (pw, ph) = (side(width)?, side(height)?);

    if u64::from(pw) * u64::from(ph) > MAX_SURFACE_PIXELS {
        return Err(too_large());
    }
    Ok((pw, ph))
}

fn paint(colour: Colour) -> Color {
    Color::from_rgba8(colour.r, colour.g, colour.b, colour.a)
}

fn polyline(points: &[Point], scale: f64) -> Option<BezPath> {
    if points.len() < 2 || !points.iter().all(|p| p.x.is_finite() && p.y.is_finite()) {
        return None;
    }
    let mut path = BezPath::new();
    path.move_to((points[0].x * scale, points[0].y * scale));
    for p in &points[1..] {
        path.line_to((p.x * scale, p.y * scale));
    }
    Some(path)
}

fn to_pixmap(src: &PixelBuffer) -> Result<Pixmap> {
    let w = u16::try_from(src.width())
        .map_err(|_| SquiggleError::dimension(src.width(), src.height(), "backdrop too wide"))?;
    let h = u16::try_from(src.height())
        .map_err(|_| SquiggleError::dimension(src.width(), src.height(), "backdrop too tall"))?;

    let mut translucent = false;
    let pixels = src
        .pixels()
        .map(|[r, g, b, a]| {
            translucent |= a != 255;
            let [r, g, b, a] = premultiply([r, g, b, a]);
            PremulRgba8 { r, g, b, a }
        })
        .collect();

    Ok(Pixmap::from_parts_with_opacity(pixels, w, h, translucent))
}

fn premultiply([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    let scale = |c: u8| ((u16::from(c) * u16::from(a) + 127) / 255) as u8;
    [scale(r), scale(g), scale(b), a]
}

fn unpremultiply([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let scale = |c: u8| ((u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a)).min(255) as u8;
    [scale(r), scale(g), scale(b), a]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(points: &[(f64, f64)]) -> Squiggle {
        Squiggle {
            row: 0,
            points: points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        }
    }

    #[test]
    fn test_new_fills_background() {
        let surface = Canvas::new(3, 2, 1, Colour::WHITE).unwrap().finish();
        assert_eq!(surface.pixel_size(), (3, 2));
        assert_eq!(surface.pixel(2, 1), Some(Colour::WHITE));
        assert_eq!(surface.pixel(3, 0), None);
    }

    #[test]
    fn test_scale_multiplies_pixels() {
        let surface = Canvas::new(3, 2, 4, Colour::WHITE).unwrap().finish();
        assert_eq!(surface.size(), (3, 2));
        assert_eq!(surface.pixel_size(), (12, 8));

        let zero = Canvas::new(3, 2, 0, Colour::WHITE).unwrap().finish();
        assert_eq!(zero.scale(), 1);
    }

    #[test]
    fn test_new_rejects_oversized_surfaces() {
        for (w, h, scale) in [(600, 400, 8_000_000), (600, 400, 200), (8000, 8000, 2), (0, 4, 1)] {
            let result = Canvas::new(w, h, scale, Colour::WHITE);
            assert!(
                matches!(result, Err(SquiggleError::InvalidDimension { .. })),
                "{w}x{h} at scale {scale} should be rejected"
            );
        }
    }

    #[test]
    fn test_horizontal_stroke_covers_its_width() {
        let mut canvas = Canvas::new(10, 10, 1, Colour::WHITE).unwrap();
        assert!(canvas.stroke_squiggle(&line(&[(1.0, 5.0), (9.0, 5.0)]), Colour::BLACK, 2.0));
        let surface = canvas.finish();

        // Pixel rows 4 and 5 straddle y = 5 and are fully inside the stroke.
        assert_eq!(surface.pixel(5, 4), Some(Colour::BLACK));
        assert_eq!(surface.pixel(5, 5), Some(Colour::BLACK));
        assert_eq!(surface.pixel(5, 1), Some(Colour::WHITE));
        assert_eq!(surface.pixel(5, 8), Some(Colour::WHITE));
    }

    #[test]
    fn test_stroke_edges_are_antialiased() {
        let mut canvas = Canvas::new(10, 10, 1, Colour::WHITE).unwrap();
        canvas.stroke_squiggle(&line(&[(0.0, 5.0), (10.0, 5.0)]), Colour::BLACK, 1.0);
        let surface = canvas.finish();

        // The stroke spans y 4.5..5.5, so rows 4 and 5 are each half covered.
        let edge = surface.pixel(5, 4).unwrap();
        assert!(edge.r > 0 && edge.r < 255, "expected partial coverage, got {edge}");
    }

    #[test]
    fn test_translucent_joints_composite_once() {
        let colour = Colour::new(0, 0, 0, 128);
        let mut canvas = Canvas::new(12, 4, 1, Colour::WHITE).unwrap();
        canvas.stroke_squiggle(&line(&[(1.0, 2.0), (6.0, 2.0), (11.0, 2.0)]), colour, 2.0);
        let surface = canvas.finish();

        let mid_segment = surface.pixel(3, 1).unwrap();
        let joint = surface.pixel(6, 1).unwrap();
        assert!(mid_segment.r > 100 && mid_segment.r < 160, "got {mid_segment}");
        assert_eq!(joint, mid_segment);
    }

    #[test]
    fn test_degenerate_strokes_are_skipped() {
        let mut canvas = Canvas::new(4, 4, 1, Colour::WHITE).unwrap();
        assert!(!canvas.stroke_squiggle(&line(&[(1.0, 1.0)]), Colour::BLACK, 2.0));
        assert!(!canvas.stroke_squiggle(&line(&[(f64::NAN, 0.0), (1.0, 1.0)]), Colour::BLACK, 2.0));
        assert!(!canvas.stroke_squiggle(&line(&[(0.0, 0.0), (1.0, 1.0)]), Colour::BLACK, 0.0));
        let surface = canvas.finish();
        assert!(surface.image().pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_stroke_outside_canvas_is_clipped() {
        let mut canvas = Canvas::new(4, 4, 1, Colour::WHITE).unwrap();
        canvas.stroke_squiggle(&line(&[(-50.0, -50.0), (-40.0, -40.0)]), Colour::BLACK, 2.0);
        let surface = canvas.finish();
        assert!(surface.image().pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_backdrop_nearest_neighbour() {
        let src = PixelBuffer::from_fn(2, 1, |x, _| if x == 0 { [255, 0, 0, 255] } else { [0, 0, 255, 255] });
        let mut canvas = Canvas::new(4, 2, 1, Colour::WHITE).unwrap();
        canvas.draw_backdrop(&src, 1.0).unwrap();
        let surface = canvas.finish();

        assert_eq!(surface.pixel(0, 0), Some(Colour::rgb(255, 0, 0)));
        assert_eq!(surface.pixel(0, 1), Some(Colour::rgb(255, 0, 0)));
        assert_eq!(surface.pixel(3, 0), Some(Colour::rgb(0, 0, 255)));
        assert_eq!(surface.pixel(3, 1), Some(Colour::rgb(0, 0, 255)));
    }

    #[test]
    fn test_backdrop_at_zero_opacity_is_invisible() {
        let src = PixelBuffer::filled(2, 2, [0, 0, 0, 255]);
        let mut canvas = Canvas::new(4, 4, 1, Colour::WHITE).unwrap();
        canvas.draw_backdrop(&src, 0.0).unwrap();
        let surface = canvas.finish();
        assert!(surface.image().pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_transparent_background_stays_transparent() {
        let surface = Canvas::new(2, 2, 1, Colour::TRANSPARENT).unwrap().finish();
        assert!(surface.image().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn test_premultiply_round_trip() {
        assert_eq!(premultiply([255, 128, 0, 255]), [255, 128, 0, 255]);
        assert_eq!(premultiply([200, 100, 50, 0]), [0, 0, 0, 0]);
        assert_eq!(premultiply([255, 0, 255, 128]), [128, 0, 128, 128]);
        assert_eq!(unpremultiply([128, 0, 128, 128]), [255, 0, 255, 128]);
        assert_eq!(unpremultiply([0, 0, 0, 0]), [0, 0, 0, 0]);
    }
}
