use miette::Diagnostic;
use thiserror::Error;

/// Main error type for squiggle operations
#[derive(Error, Diagnostic, Debug)]
pub enum SquiggleError {
    #[error("IO error: {0}")]
    #[diagnostic(code(squiggle::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(squiggle::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Decode error: {message}")]
    #[diagnostic(code(squiggle::decode))]
    Decode {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Invalid dimension {width}x{height}: {message}")]
    #[diagnostic(
        code(squiggle::dimension),
        help("Width and height must both be greater than zero")
    )]
    InvalidDimension {
        width: u32,
        height: u32,
        message: String,
    },

    #[error("Unsupported file type: {name}")]
    #[diagnostic(
        code(squiggle::file_type),
        help("Only .png, .jpg and .jpeg images are accepted")
    )]
    UnsupportedFileType { name: String },

    #[error("Config error: {message}")]
    #[diagnostic(code(squiggle::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Build error: {message}")]
    #[diagnostic(code(squiggle::build))]
    Build {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl SquiggleError {
    /// Shorthand for an `InvalidDimension` error.
    pub fn dimension(width: u32, height: u32, message: impl Into<String>) -> Self {
        Self::InvalidDimension {
            width,
            height,
            message: message.into(),
        }
    }

    /// Shorthand for a `Config` error without help text.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SquiggleError>;
