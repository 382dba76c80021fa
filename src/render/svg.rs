//! SVG export of the vector strokes.
//!
//! Each squiggle becomes one `<polyline>`, so the output stays editable in
//! vector tools.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::{Result, SquiggleError};
use crate::types::{Colour, Layout, RenderConfig, Squiggle};

/// Render squiggles as an SVG document sized to the layout.
pub fn to_svg(layout: &Layout, squiggles: &[Squiggle], config: &RenderConfig) -> String {
    let (w, h) = (layout.display_width, layout.display_height);
    let mut svg = String::new();

    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );

    if !config.background.is_transparent() {
        let _ = writeln!(
            svg,
            r#"  <rect width="100%" height="100%" fill="{}"{}/>"#,
            hex_rgb(config.background),
            opacity_attr("fill-opacity", config.background)
        );
    }

    let _ = writeln!(
        svg,
        r#"  <g fill="none" stroke="{}" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round"{}>"#,
        hex_rgb(config.stroke_colour),
        number(config.stroke_width),
        opacity_attr("stroke-opacity", config.stroke_colour)
    );

    for squiggle in squiggles.iter().filter(|s| s.points.len() > 1) {
        let points: Vec<String> = squiggle
            .points
            .iter()
            .map(|p| format!("{},{}", number(p.x), number(p.y)))
            .collect();
        let _ = writeln!(svg, r#"    <polyline points="{}"/>"#, points.join(" "));
    }

    svg.push_str("  </g>\n</svg>\n");
    svg
}

/// Write squiggles to an SVG file.
pub fn write_svg(path: &Path, layout: &Layout, squiggles: &[Squiggle], config: &RenderConfig) -> Result<()> {
    fs::write(path, to_svg(layout, squiggles, config)).map_err(|e| SquiggleError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write SVG: {}", e),
    })
}

fn hex_rgb(colour: Colour) -> String {
    format!("#{:02X}{:02X}{:02X}", colour.r, colour.g, colour.b)
}

fn opacity_attr(name: &str, colour: Colour) -> String {
    if colour.is_opaque() {
        String::new()
    } else {
        format!(r#" {}="{}""#, name, number(colour.a as f64 / 255.0))
    }
}

/// Format a coordinate with at most three decimals and no trailing zeros.
fn number(v: f64) -> String {
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;
    use tempfile::tempdir;

    fn layout() -> Layout {
        Layout {
            source_width: 20,
            source_height: 10,
            display_width: 20,
            display_height: 10,
            columns: 2,
            rows: 1,
        }
    }

    fn squiggle() -> Squiggle {
        Squiggle {
            row: 0,
            points: vec![Point::new(0.0, 5.0), Point::new(10.0, 6.25), Point::new(20.0, 3.5)],
        }
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(number(5.0), "5");
        assert_eq!(number(6.25), "6.25");
        assert_eq!(number(1.23456), "1.235");
        assert_eq!(number(-0.0001), "0");
    }

    #[test]
    fn test_svg_contains_polyline_per_row() {
        let svg = to_svg(&layout(), &[squiggle(), squiggle()], &RenderConfig::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 20 10""#));
        assert!(svg.contains(r##"fill="#FFFFFF""##));
        assert!(svg.contains(r##"stroke="#000000""##));
        assert!(svg.contains(r#"stroke-width="2""#));
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains(r#"points="0,5 10,6.25 20,3.5""#));
    }

    #[test]
    fn test_svg_transparent_background_and_translucent_stroke() {
        let config = RenderConfig {
            background: Colour::TRANSPARENT,
            stroke_colour: Colour::new(0, 0, 0, 128),
            ..Default::default()
        };
        let svg = to_svg(&layout(), &[squiggle()], &config);
        assert!(!svg.contains("<rect"));
        assert!(svg.contains("stroke-opacity=\"0.502\""));
    }

    #[test]
    fn test_write_svg() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.svg");
        write_svg(&path, &layout(), &[squiggle()], &RenderConfig::default()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.trim_end().ends_with("</svg>"));
    }
}
