//! Area-averaging resampler.
//!
//! Each output pixel is the coverage-weighted mean of the source pixels its
//! footprint overlaps. The filter is separable: one axis is resampled, then
//! the other, in whichever order keeps the intermediate plane smaller.

use crate::error::{Result, SquiggleError};

use super::PixelBuffer;

/// Resample `src` to exactly `width` x `height`.
///
/// Fails with `InvalidDimension` when the target or the source is empty.
/// Resampling to the source's own size returns an identical copy.
#[tracing::instrument(skip(src), fields(from = ?src.size()))]
pub fn resample(src: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer> {
    if width == 0 || height == 0 {
        return Err(SquiggleError::dimension(
            width,
            height,
            "resample target must be non-zero",
        ));
    }
    if src.is_empty() {
        return Err(SquiggleError::dimension(
            src.width(),
            src.height(),
            "cannot resample an empty image",
        ));
    }
    if src.size() == (width, height) {
        return Ok(src.clone());
    }

    let (src_w, src_h) = (src.width() as usize, src.height() as usize);
    let (dst_w, dst_h) = (width as usize, height as usize);
    let x_taps = coverage_taps(src.width(), width);
    let y_taps = coverage_taps(src.height(), height);
    let data = src.data();

    // The first pass keeps one full source axis; pick the smaller intermediate.
    let plane = if src_h * dst_w <= dst_h * src_w {
        let rows = along_x(src_w, src_h, &x_taps, |i| f64::from(data[i]));
        along_y(dst_w, &y_taps, |i| rows[i])
    } else {
        let cols = along_y(src_w, &y_taps, |i| f64::from(data[i]));
        along_x(src_w, dst_h, &x_taps, |i| cols[i])
    };

    let bytes = plane
        .iter()
        .map(|v| v.round().clamp(0.0, 255.0) as u8)
        .collect();
    PixelBuffer::new(width, height, bytes)
}

/// Resample each of `height` rows of a `width` wide RGBA plane along x.
fn along_x(
    width: usize,
    height: usize,
    taps: &[Vec<(usize, f64)>],
    get: impl Fn(usize) -> f64,
) -> Vec<f64> {
    let out_w = taps.len();
    let mut out = vec![0.0f64; out_w * height * 4];
    for y in 0..height {
        for (ox, pixel_taps) in taps.iter().enumerate() {
            let at = (y * out_w + ox) * 4;
            for &(ix, weight) in pixel_taps {
                let from = (y * width + ix) * 4;
                for c in 0..4 {
                    out[at + c] += get(from + c) * weight;
                }
            }
        }
    }
    out
}

/// Resample a `width` wide RGBA plane along y.
fn along_y(width: usize, taps: &[Vec<(usize, f64)>], get: impl Fn(usize) -> f64) -> Vec<f64> {
    let stride = width * 4;
    let mut out = vec![0.0f64; stride * taps.len()];
    for (oy, row_taps) in taps.iter().enumerate() {
        let at = oy * stride;
        for &(iy, weight) in row_taps {
            let from = iy * stride;
            for i in 0..stride {
                out[at + i] += get(from + i) * weight;
            }
        }
    }
    out
}

/// For every output index, the source indices it overlaps and their weights.
///
/// Weights of one output index always sum to 1.
fn coverage_taps(src_len: u32, dst_len: u32) -> Vec<Vec<(usize, f64)>> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|o| {
            let start = o as f64 * scale;
            let end = (o + 1) as f64 * scale;
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(src_len as usize);

            (first..last)
                .filter_map(|i| {
                    let cover = end.min(i as f64 + 1.0) - start.max(i as f64);
                    (cover > 0.0).then_some((i, cover / scale))
                })
                .collect()
        })
        .collect()
}
