//! Watch command implementation.
//!
//! Every change to the watched file is submitted to a [`RenderSession`].
//! Bursts of events produce several overlapping decodes; only the newest one
//! is rendered and written.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use clap::Args;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use tracing::{debug, warn};

use crate::error::{Result, SquiggleError};
use crate::output::{dimensions, display_path, Printer};
use crate::raster::ImageSource;
use crate::render::OutputFormat;
use crate::session::{Completion, RenderSession};

use super::ConfigArgs;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Re-render an image whenever it changes on disk
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Image to watch
    pub file: PathBuf,

    /// Output directory (default: manifest output, then "dist")
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Which files to write
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Scale factor for PNG output (integer upscaling)
    #[arg(long)]
    pub scale: Option<u32>,

    /// Render once and exit instead of watching
    #[arg(long)]
    pub once: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Where finished renders go.
struct Sink<'a> {
    dir: PathBuf,
    stem: String,
    format: OutputFormat,
    printer: &'a Printer,
}

impl Sink<'_> {
    /// Report one completion, writing the artwork if it was rendered.
    fn apply(&self, session: &RenderSession, outcome: Result<Completion>) -> Result<()> {
        match outcome {
            Ok(Completion::Rendered(generation)) => {
                let Some(output) = session.output() else {
                    return Ok(());
                };
                let layout = &output.artwork.layout;
                output
                    .artwork
                    .write(&self.dir, &self.stem, self.format, session.config())?;
                self.printer.status(
                    "Rendered",
                    &format!(
                        "{} {} ({})",
                        display_path(Path::new(&output.source)),
                        self.printer.dim(&generation.to_string()),
                        dimensions(layout.display_width, layout.display_height)
                    ),
                );
            }
            Ok(Completion::Stale(generation)) => {
                debug!(%generation, "superseded");
            }
            Err(e) => {
                // The previous output stays on disk.
                self.printer.error("Failed", &e.to_string());
            }
        }
        Ok(())
    }
}

/// Whether a file system event should trigger a re-render of `target`.
fn is_relevant(event: &Event, target: &Path) -> bool {
    let kind_matches = matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_));
    kind_matches
        && event
            .paths
            .iter()
            .any(|p| p.file_name().is_some() && p.file_name() == target.file_name())
}

fn watch_error(e: notify::Error) -> SquiggleError {
    SquiggleError::Build {
        message: format!("Failed to watch file: {}", e),
        help: None,
    }
}

pub fn run(args: WatchArgs, printer: &Printer) -> Result<()> {
    let manifest = args.config.resolve(Path::new("."))?;
    let source = ImageSource::path(&args.file);
    source.check_file_type()?;

    let sink = Sink {
        dir: args.output.clone().unwrap_or_else(|| manifest.output.clone()),
        stem: source.stem(),
        format: args.format.unwrap_or(manifest.format),
        printer,
    };
    fs::create_dir_all(&sink.dir).map_err(|e| SquiggleError::Io {
        path: sink.dir.clone(),
        message: format!("Failed to create output directory: {}", e),
    })?;

    let scale = args.scale.unwrap_or_else(|| manifest.effective_scale());
    let mut session = RenderSession::new(manifest.render, scale);
    session.submit(source.clone())?;

    if args.once {
        for outcome in session.wait_idle() {
            sink.apply(&session, outcome)?;
        }
        return Ok(());
    }

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx).map_err(watch_error)?;
    let dir = match args.file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .map_err(watch_error)?;

    printer.info("Watching", &display_path(&args.file));

    loop {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(Ok(event)) if is_relevant(&event, &args.file) => {
                let generation = session.submit(source.clone())?;
                debug!(%generation, kind = ?event.kind, "change detected");
            }
            Ok(Ok(_)) => {}
            Ok(Err(e)) => warn!(error = %e, "watch error"),
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }

        for outcome in session.poll() {
            sink.apply(&session, outcome)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind, RemoveKind};
    use tempfile::tempdir;

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn test_is_relevant() {
        let target = Path::new("pics/photo.png");

        assert!(is_relevant(&event(EventKind::Modify(ModifyKind::Any), "/abs/pics/photo.png"), target));
        assert!(is_relevant(&event(EventKind::Create(CreateKind::File), "pics/photo.png"), target));
        assert!(!is_relevant(&event(EventKind::Modify(ModifyKind::Any), "pics/other.png"), target));
        assert!(!is_relevant(&event(EventKind::Remove(RemoveKind::File), "pics/photo.png"), target));
    }

    #[test]
    fn test_watch_once_writes_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("photo.png");
        image::RgbaImage::from_pixel(20, 10, image::Rgba([0, 0, 0, 255]))
            .save(&input)
            .unwrap();
        let out = dir.path().join("out");

        let args = WatchArgs {
            file: input,
            output: Some(out.clone()),
            format: Some(OutputFormat::Svg),
            scale: None,
            once: true,
            config: ConfigArgs {
                display_width: Some(20),
                rows: Some(2),
                ..Default::default()
            },
        };
        run(args, &Printer::new()).unwrap();

        assert!(out.join("photo.svg").exists());
        assert!(!out.join("photo.png").exists());
    }

    #[test]
    fn test_watch_rejects_unsupported_file() {
        let args = WatchArgs {
            file: PathBuf::from("notes.txt"),
            output: None,
            format: None,
            scale: None,
            once: true,
            config: ConfigArgs::default(),
        };
        let err = run(args, &Printer::new()).unwrap_err();
        assert!(matches!(err, SquiggleError::UnsupportedFileType { .. }));
    }
}
