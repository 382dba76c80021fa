//! Status lines for the squiggle CLI.
//!
//! Each line is a right-aligned verb followed by a message, written to
//! stderr so stdout stays free for `inspect --json`.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

const RESET: &str = "\x1b[0m";
const DIM: &str = "\x1b[2m";

/// Width of the verb column.
const VERB_WIDTH: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Progress,
    Note,
    Warning,
    Failure,
}

impl Tone {
    /// Bold plus foreground colour.
    fn ansi(self) -> &'static str {
        match self {
            Tone::Progress => "\x1b[1;32m",
            Tone::Note => "\x1b[1;36m",
            Tone::Warning => "\x1b[1;33m",
            Tone::Failure => "\x1b[1;31m",
        }
    }
}

/// Writes status lines to stderr, coloured when stderr is a terminal and
/// `NO_COLOR` is unset.
pub struct Printer {
    colour: bool,
}

impl Printer {
    pub fn new() -> Self {
        let colour = io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self { colour }
    }

    /// A pipeline step starting, e.g. `   Rendering photo.png (600x400)`.
    pub fn status(&self, verb: &str, message: &str) {
        self.emit(Tone::Progress, verb, message);
    }

    pub fn success(&self, verb: &str, message: &str) {
        self.emit(Tone::Progress, verb, message);
    }

    pub fn info(&self, verb: &str, message: &str) {
        self.emit(Tone::Note, verb, message);
    }

    pub fn warning(&self, verb: &str, message: &str) {
        self.emit(Tone::Warning, verb, message);
    }

    pub fn error(&self, verb: &str, message: &str) {
        self.emit(Tone::Failure, verb, message);
    }

    /// Dim `text` for secondary detail such as output paths.
    pub fn dim(&self, text: &str) -> String {
        if self.colour {
            format!("{DIM}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn emit(&self, tone: Tone, verb: &str, message: &str) {
        // A closed stderr is not worth failing a render over.
        let _ = writeln!(io::stderr().lock(), "{}", self.line(tone, verb, message));
    }

    fn line(&self, tone: Tone, verb: &str, message: &str) -> String {
        if self.colour {
            format!("{}{verb:>VERB_WIDTH$}{RESET} {message}", tone.ansi())
        } else {
            format!("{verb:>VERB_WIDTH$} {message}")
        }
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

/// `plural(1, "file", "files")` gives "1 file".
pub fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

/// `WxH`.
pub fn dimensions(width: u32, height: u32) -> String {
    format!("{}x{}", width, height)
}

/// `path` relative to the working directory when it lies beneath it.
pub fn display_path(path: &Path) -> String {
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf));
    match relative {
        Some(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Some(rel) => rel.display().to_string(),
        None => path.display().to_string(),
    }
}
