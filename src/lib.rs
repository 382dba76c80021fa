//! squiggle - Waveform line art from images
//!
//! An image is decoded, area-averaged down to one sample per output column
//! and row, converted to inverted luminance and redrawn as one horizontal
//! squiggle per row. Darker regions get taller waves.
//!
//! [`pipeline::render`] runs the stages synchronously. [`RenderSession`]
//! wraps them with threaded decoding and generation tokens so that only the
//! most recent submission is ever drawn.

pub mod cli;
pub mod discovery;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod raster;
pub mod render;
pub mod session;
pub mod types;

pub use discovery::{Manifest, ScanResult};
pub use error::{Result, SquiggleError};
pub use pipeline::Artwork;
pub use raster::{decode, decode_bytes, resample, ImageSource, LuminanceGrid, PixelBuffer};
pub use render::{nested_sine, Canvas, OutputFormat, Surface, WaveformRenderer};
pub use session::{Completion, Generation, RenderSession};
pub use types::{Colour, Layout, Point, RenderConfig, Squiggle};
