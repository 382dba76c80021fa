//! Owned RGBA pixel buffer.

use image::RgbaImage;

use crate::error::{Result, SquiggleError};

/// Row-major RGBA8 pixels with known dimensions.
///
/// The byte length is always `width * height * 4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes, checking the length against the dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(SquiggleError::dimension(
                width,
                height,
                format!("expected {} bytes of RGBA data, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer filled with a single colour.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the dimensions as (width, height).
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Check whether the buffer holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Raw RGBA bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get a pixel, or `None` when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    /// The pixels of one row as a byte slice.
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * 4;
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Iterate over pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.data
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Copy into an `image` crate buffer.
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_length() {
        assert!(PixelBuffer::new(2, 2, vec![0; 16]).is_ok());
        let err = PixelBuffer::new(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, SquiggleError::InvalidDimension { .. }));
    }

    #[test]
    fn test_filled_and_get() {
        let buffer = PixelBuffer::filled(3, 2, [1, 2, 3, 4]);
        assert_eq!(buffer.data().len(), 24);
        assert_eq!(buffer.get(2, 1), Some([1, 2, 3, 4]));
        assert_eq!(buffer.get(3, 0), None);
    }

    #[test]
    fn test_from_fn_is_row_major() {
        let buffer = PixelBuffer::from_fn(2, 2, |x, y| [x as u8, y as u8, 0, 255]);
        assert_eq!(buffer.get(1, 0), Some([1, 0, 0, 255]));
        assert_eq!(buffer.get(0, 1), Some([0, 1, 0, 255]));
        assert_eq!(buffer.row(1), &[0, 1, 0, 255, 1, 1, 0, 255]);
    }

    #[test]
    fn test_rgba_image_conversion() {
        let img = RgbaImage::from_pixel(4, 3, image::Rgba([9, 8, 7, 6]));
        let buffer = PixelBuffer::from(img);
        assert_eq!(buffer.size(), (4, 3));
        assert_eq!(buffer.to_rgba_image().get_pixel(3, 2).0, [9, 8, 7, 6]);
    }
}
