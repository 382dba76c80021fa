//! Raster input side of the pipeline: decode, resample, luminance.

mod buffer;
mod decode;
mod luminance;
mod resample;
mod source;

pub use buffer::PixelBuffer;
pub use decode::{
    builtin_image, decode, decode_bytes, spawn_decode, spawn_decode_tagged, DecodeQueue,
    PendingDecode,
};
pub use luminance::{inverted_luminance, LuminanceGrid};
pub use resample::resample;
pub use source::{is_accepted, ImageSource, ACCEPTED_EXTENSIONS};
