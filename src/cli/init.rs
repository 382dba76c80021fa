//! Init command implementation.
//!
//! Writes a `squiggle.yaml` holding every render option at its default, as a
//! starting point for tuning.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::discovery::{Manifest, MANIFEST_FILENAME};
use crate::error::{Result, SquiggleError};
use crate::output::{display_path, Printer};

/// Initialize a squiggle project by generating a squiggle.yaml manifest
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing squiggle.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let manifest_path = args.path.join(MANIFEST_FILENAME);

    if manifest_path.exists() && !args.force {
        return Err(SquiggleError::Build {
            message: format!("{} already exists", MANIFEST_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    let yaml = Manifest::default().to_yaml()?;
    fs::write(&manifest_path, yaml).map_err(|e| SquiggleError::Io {
        path: manifest_path.clone(),
        message: format!("Failed to write manifest: {}", e),
    })?;

    printer.success("Created", &display_path(&manifest_path));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_init_creates_manifest() {
        let dir = tempdir().unwrap();

        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: false,
        };
        run(args, &Printer::new()).unwrap();

        let manifest_path = dir.path().join(MANIFEST_FILENAME);
        let content = fs::read_to_string(&manifest_path).unwrap();
        assert!(content.contains("output: dist"));
        assert!(content.contains("nestingDepth: 12"));
        assert_eq!(Manifest::load(&manifest_path).unwrap(), Manifest::default());
    }

    #[test]
    fn test_init_errors_if_manifest_exists() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILENAME), "output: build").unwrap();

        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: false,
        };

        assert!(run(args, &Printer::new()).is_err());
        let content = fs::read_to_string(dir.path().join(MANIFEST_FILENAME)).unwrap();
        assert_eq!(content, "output: build");
    }

    #[test]
    fn test_init_force_overwrites() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILENAME), "output: build").unwrap();

        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: true,
        };
        run(args, &Printer::new()).unwrap();

        let content = fs::read_to_string(dir.path().join(MANIFEST_FILENAME)).unwrap();
        assert!(content.contains("output: dist"));
    }
}
