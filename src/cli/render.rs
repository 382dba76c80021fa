//! Render command implementation.
//!
//! Decodes a small window of inputs ahead on worker threads, then renders and
//! writes the results in command-line order. With no inputs the builtin image
//! is rendered.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use tracing::debug;

use crate::discovery::{collect_inputs, Manifest};
use crate::error::{Result, SquiggleError};
use crate::output::{dimensions, display_path, plural, Printer};
use crate::pipeline;
use crate::raster::{DecodeQueue, ImageSource, PixelBuffer};
use crate::render::OutputFormat;

use super::ConfigArgs;

/// Decodes started ahead of the image being rendered.
const DECODE_WINDOW: usize = 2;

/// Render images to waveform line art
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Images or directories to render (default: the builtin image)
    pub files: Vec<PathBuf>,

    /// Output directory (default: manifest output, then "dist")
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Which files to write
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Scale factor for PNG output (integer upscaling)
    #[arg(long)]
    pub scale: Option<u32>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

pub fn run(args: RenderArgs, printer: &Printer) -> Result<()> {
    let manifest = args.config.resolve(Path::new("."))?;
    let output = args.output.clone().unwrap_or_else(|| manifest.output.clone());
    let format = args.format.unwrap_or(manifest.format);
    let scale = args.scale.unwrap_or_else(|| manifest.effective_scale()).max(1);

    let mut failed = 0;
    let sources = if args.files.is_empty() {
        vec![ImageSource::Builtin]
    } else {
        let scan = collect_inputs(&args.files, &manifest);
        for path in &scan.rejected {
            let err = SquiggleError::UnsupportedFileType {
                name: display_path(path),
            };
            printer.warning("Skipping", &err.to_string());
            failed += 1;
        }
        scan.images.into_iter().map(ImageSource::Path).collect()
    };

    if sources.is_empty() && failed == 0 {
        printer.warning("Nothing", "no images found");
        return Ok(());
    }

    fs::create_dir_all(&output).map_err(|e| SquiggleError::Io {
        path: output.clone(),
        message: format!("Failed to create output directory: {}", e),
    })?;

    let total = sources.len() + failed;
    let mut written = 0;
    for (source, decoded) in DecodeQueue::new(sources, DECODE_WINDOW) {
        match render_one(&source, decoded, &manifest, &output, format, scale, printer) {
            Ok(count) => written += count,
            Err(e) => {
                printer.error("Failed", &format!("{}: {}", source, e));
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(SquiggleError::Build {
            message: format!("{} of {} failed", failed, plural(total, "image", "images")),
            help: Some("Inputs must be PNG or JPEG files".to_string()),
        });
    }

    printer.success(
        "Finished",
        &format!("{} in {}", plural(written, "file", "files"), display_path(&output)),
    );
    Ok(())
}

fn render_one(
    source: &ImageSource,
    decoded: Result<PixelBuffer>,
    manifest: &Manifest,
    output: &Path,
    format: OutputFormat,
    scale: u32,
    printer: &Printer,
) -> Result<usize> {
    let pixels = decoded?;
    let artwork = pipeline::render(&pixels, &manifest.render, scale)?;
    let layout = &artwork.layout;

    printer.status(
        "Rendering",
        &format!(
            "{} ({}, {})",
            source,
            dimensions(layout.display_width, layout.display_height),
            plural(artwork.squiggles.len(), "row", "rows")
        ),
    );

    let paths = artwork.write(output, &source.stem(), format, &manifest.render)?;
    for path in &paths {
        debug!(path = %path.display(), "wrote output");
        printer.info("Wrote", &printer.dim(&display_path(path)));
    }
    Ok(paths.len())
}
