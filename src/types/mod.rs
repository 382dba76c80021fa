//! Core types for squiggle.

mod colour;
mod config;
mod geometry;

pub use colour::Colour;
pub use config::{RenderConfig, DEFAULT_DISPLAY_WIDTH, DEFAULT_NESTING_DEPTH, DEFAULT_SAMPLE_ROWS};
pub use geometry::{Layout, Point, Squiggle, MAX_DISPLAY_SIZE};
