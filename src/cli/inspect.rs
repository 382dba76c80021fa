//! Inspect command implementation.
//!
//! Runs the decode, resample and luminance stages without drawing anything.

use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;

use crate::error::{Result, SquiggleError};
use crate::output::{dimensions, plural, Printer};
use crate::pipeline;
use crate::raster::{decode, ImageSource, LuminanceGrid};
use crate::types::Layout;

use super::ConfigArgs;

/// Show the sampled layout and luminance of an image
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Image to inspect (default: the builtin image)
    pub file: Option<PathBuf>,

    /// Print the full luminance grid as JSON on stdout
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    source: String,
    layout: &'a Layout,
    mean: f64,
    luminance: &'a LuminanceGrid,
}

pub fn run(args: InspectArgs, printer: &Printer) -> Result<()> {
    let manifest = args.config.resolve(Path::new("."))?;
    let source = args.file.map(ImageSource::Path).unwrap_or(ImageSource::Builtin);
    source.check_file_type()?;

    let pixels = decode(&source)?;
    let (layout, grid) = pipeline::sample(&pixels, &manifest.render)?;

    if args.json {
        println!("{}", report_json(&source, &layout, &grid)?);
        return Ok(());
    }

    printer.info("Source", &format!("{} ({})", source, dimensions(layout.source_width, layout.source_height)));
    printer.info("Display", &dimensions(layout.display_width, layout.display_height));
    printer.info(
        "Sampled",
        &format!(
            "{} by {}",
            plural(grid.width() as usize, "column", "columns"),
            plural(grid.height() as usize, "row", "rows")
        ),
    );
    printer.info("Mean", &format!("{:.3}", grid.mean()));
    if let Some((min, max)) = grid.range() {
        printer.info("Range", &format!("{:.3} to {:.3}", min, max));
    }
    Ok(())
}

fn report_json(source: &ImageSource, layout: &Layout, grid: &LuminanceGrid) -> Result<String> {
    let report = Report {
        source: source.label(),
        layout,
        mean: grid.mean(),
        luminance: grid,
    };
    serde_json::to_string_pretty(&report).map_err(|e| SquiggleError::Build {
        message: format!("Failed to serialize report: {}", e),
        help: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::builtin_image;
    use crate::types::RenderConfig;

    #[test]
    fn test_report_json_shape() {
        let config = RenderConfig {
            display_width: 8,
            sample_rows: 3,
            ..Default::default()
        };
        let (layout, grid) = pipeline::sample(&builtin_image(), &config).unwrap();

        let json = report_json(&ImageSource::Builtin, &layout, &grid).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["source"], "builtin");
        assert_eq!(value["layout"]["displayWidth"], 8);
        assert_eq!(value["luminance"]["rows"].as_array().unwrap().len(), 3);
        assert_eq!(value["luminance"]["rows"][0].as_array().unwrap().len(), 8);
    }

    #[test]
    fn test_inspect_rejects_unsupported_file() {
        let args = InspectArgs {
            file: Some(PathBuf::from("notes.txt")),
            json: false,
            config: ConfigArgs::default(),
        };
        let err = run(args, &Printer::new()).unwrap_err();
        assert!(matches!(err, SquiggleError::UnsupportedFileType { .. }));
    }
}
