pub mod completions;
pub mod init;
pub mod inspect;
pub mod render;
pub mod watch;

use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::discovery::{load_manifest, Manifest};
use crate::error::Result;

/// squiggle - Turn images into squiggly waveform line art
#[derive(Parser, Debug)]
#[command(name = "squiggle")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render images to waveform line art
    Render(render::RenderArgs),

    /// Re-render an image whenever it changes on disk
    Watch(watch::WatchArgs),

    /// Show the sampled layout and luminance of an image
    Inspect(inspect::InspectArgs),

    /// Initialize a squiggle project (generates squiggle.yaml)
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Render options shared by every command that renders.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Manifest to read instead of ./squiggle.yaml
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Output width in logical units
    #[arg(long)]
    pub display_width: Option<u32>,

    /// Number of sampled rows
    #[arg(long)]
    pub rows: Option<u32>,

    /// Amplitude scale (fraction of the half row height)
    #[arg(long)]
    pub amplitude: Option<f64>,

    /// Radians advanced per column
    #[arg(long)]
    pub frequency: Option<f64>,

    /// Nesting depth of the sine shaping
    #[arg(long)]
    pub depth: Option<u32>,

    /// Opacity of the pixelated source beneath the strokes
    #[arg(long)]
    pub backdrop_opacity: Option<f32>,
}

impl ConfigArgs {
    /// Load the manifest from `root` and apply command-line overrides.
    pub fn resolve(&self, root: &Path) -> Result<Manifest> {
        let (mut manifest, _) = load_manifest(self.config.as_deref(), root)?;
        self.apply(&mut manifest);
        manifest.render.validate()?;
        Ok(manifest)
    }

    fn apply(&self, manifest: &mut Manifest) {
        let render = &mut manifest.render;
        if let Some(width) = self.display_width {
            render.display_width = width;
        }
        if let Some(rows) = self.rows {
            render.sample_rows = rows;
        }
        if let Some(amplitude) = self.amplitude {
            render.amplitude_scale = amplitude;
        }
        if let Some(frequency) = self.frequency {
            render.frequency = frequency;
        }
        if let Some(depth) = self.depth {
            render.nesting_depth = depth;
        }
        if let Some(opacity) = self.backdrop_opacity {
            render.backdrop_opacity = opacity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::MANIFEST_FILENAME;
    use crate::types::DEFAULT_SAMPLE_ROWS;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parses_render() {
        let cli = Cli::try_parse_from(["squiggle", "-vv", "render", "a.png", "--rows", "20"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Render(args) => {
                assert_eq!(args.files, vec![PathBuf::from("a.png")]);
                assert_eq!(args.config.rows, Some(20));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_overrides_win_over_manifest() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILENAME),
            "render:\n  sampleRows: 30\n  nestingDepth: 4\n",
        )
        .unwrap();

        let args = ConfigArgs {
            rows: Some(10),
            ..Default::default()
        };
        let manifest = args.resolve(dir.path()).unwrap();

        assert_eq!(manifest.render.sample_rows, 10);
        assert_eq!(manifest.render.nesting_depth, 4);
    }

    #[test]
    fn test_resolve_defaults() {
        let dir = tempdir().unwrap();
        let manifest = ConfigArgs::default().resolve(dir.path()).unwrap();
        assert_eq!(manifest.render.sample_rows, DEFAULT_SAMPLE_ROWS);
    }

    #[test]
    fn test_resolve_rejects_invalid_override() {
        let dir = tempdir().unwrap();
        let args = ConfigArgs {
            backdrop_opacity: Some(2.0),
            ..Default::default()
        };
        assert!(args.resolve(dir.path()).is_err());
    }
}
