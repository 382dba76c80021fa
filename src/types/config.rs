//! Render configuration.
//!
//! Every shaping constant of the waveform renderer lives here. The defaults
//! reproduce the reference look; all of them can be overridden from
//! `squiggle.yaml` or the command line.
//!
//! # Example
//!
//! ```yaml
//! displayWidth: 800
//! sampleRows: 64
//! amplitudeScale: 0.9
//! nestingDepth: 12
//! strokeColour: "#1a1a2e"
//! ```

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SquiggleError};

use super::Colour;

/// Default output width in logical units.
pub const DEFAULT_DISPLAY_WIDTH: u32 = 600;

/// Default number of rows sampled from the source.
pub const DEFAULT_SAMPLE_ROWS: u32 = 50;

/// Default nesting depth of the sine shaping function.
pub const DEFAULT_NESTING_DEPTH: u32 = 12;

/// Waveform rendering options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RenderConfig {
    /// Output width in logical units; also the number of sampled columns.
    pub display_width: u32,
    /// Number of rows sampled from the source (one squiggle per row).
    pub sample_rows: u32,
    /// Fraction of the half row height a fully dark pixel may use.
    pub amplitude_scale: f64,
    /// Radians advanced per column.
    pub frequency: f64,
    /// How many times `sin` is composed with itself.
    pub nesting_depth: u32,
    /// Added to every sine argument. Zero in the reference look.
    pub phase_shift: f64,
    /// Multiplier applied to the shaped displacement.
    pub displacement_gain: f64,
    /// Stroke width in logical units.
    pub stroke_width: f64,
    /// Stroke colour.
    pub stroke_colour: Colour,
    /// Surface fill before anything is drawn.
    pub background: Colour,
    /// Opacity of the pixelated source drawn beneath the strokes.
    pub backdrop_opacity: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            display_width: DEFAULT_DISPLAY_WIDTH,
            sample_rows: DEFAULT_SAMPLE_ROWS,
            amplitude_scale: 0.9,
            frequency: 5.0 / (2.0 * PI),
            nesting_depth: DEFAULT_NESTING_DEPTH,
            phase_shift: 0.0,
            displacement_gain: 1.8,
            stroke_width: 2.0,
            stroke_colour: Colour::BLACK,
            background: Colour::WHITE,
            backdrop_opacity: 0.0,
        }
    }
}

impl RenderConfig {
    /// Parse a config from YAML.
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| SquiggleError::Config {
            message: format!("Invalid render config: {}", e),
            help: Some(
                "Recognized options: displayWidth, sampleRows, amplitudeScale, frequency, \
                 nestingDepth, phaseShift, displacementGain, strokeWidth, strokeColour, \
                 background, backdropOpacity"
                    .to_string(),
            ),
        })
    }

    /// Check numeric options for values the renderer cannot use.
    ///
    /// Zero widths or row counts are not rejected here; they surface as
    /// `InvalidDimension` when the resampler is asked for an empty target.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("amplitudeScale", self.amplitude_scale),
            ("frequency", self.frequency),
            ("phaseShift", self.phase_shift),
            ("displacementGain", self.displacement_gain),
            ("strokeWidth", self.stroke_width),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(SquiggleError::config(format!("{} must be finite", name)));
            }
        }

        if self.amplitude_scale < 0.0 {
            return Err(SquiggleError::Config {
                message: format!("amplitudeScale must not be negative, got {}", self.amplitude_scale),
                help: Some("Use 0 for flat lines".to_string()),
            });
        }

        if self.stroke_width <= 0.0 {
            return Err(SquiggleError::config(format!(
                "strokeWidth must be positive, got {}",
                self.stroke_width
            )));
        }

        if !(0.0..=1.0).contains(&self.backdrop_opacity) {
            return Err(SquiggleError::config(format!(
                "backdropOpacity must be between 0 and 1, got {}",
                self.backdrop_opacity
            )));
        }

        Ok(())
    }
}
