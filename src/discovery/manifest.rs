//! Project manifest (squiggle.yaml) parsing.
//!
//! The manifest holds output settings and the render config shared by every
//! command run in the directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SquiggleError};
use crate::render::OutputFormat;
use crate::types::RenderConfig;

/// Project manifest loaded from squiggle.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    /// Output directory for rendered files.
    pub output: PathBuf,

    /// Which files to write.
    pub format: OutputFormat,

    /// Integer pixel scale for PNG output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,

    /// Patterns to skip while scanning directories.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excludes: Vec<String>,

    /// Waveform settings.
    pub render: RenderConfig,
}

fn default_output() -> PathBuf {
    PathBuf::from("dist")
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            output: default_output(),
            format: OutputFormat::default(),
            scale: None,
            excludes: vec![],
            render: RenderConfig::default(),
        }
    }
}

impl Manifest {
    /// Load manifest from a squiggle.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SquiggleError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| SquiggleError::Config {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check squiggle.yaml syntax".to_string()),
        })
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| SquiggleError::Build {
            message: format!("Failed to serialize manifest: {}", e),
            help: None,
        })
    }

    /// Check if a path should be excluded based on exclude patterns.
    ///
    /// `*.ext` matches a suffix, `dir/*` and `**/dir/*` match anything under a
    /// directory of that name, and any other pattern matches as a substring.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path = path.to_string_lossy().replace('\\', "/");
        self.excludes.iter().any(|pattern| matches_pattern(&path, pattern))
    }

    /// Get the effective scale factor.
    pub fn effective_scale(&self) -> u32 {
        self.scale.unwrap_or(1).max(1)
    }
}

fn matches_pattern(path: &str, pattern: &str) -> bool {
    let pattern = pattern.trim_start_matches("**/");

    if let Some(dir) = pattern.strip_suffix("/*") {
        return path.starts_with(&format!("{}/", dir)) || path.contains(&format!("/{}/", dir));
    }

    if let Some(suffix) = pattern.strip_prefix('*') {
        if !suffix.contains('/') {
            return path.ends_with(suffix);
        }
    }

    path.contains(pattern)
}
