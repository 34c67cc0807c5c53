//! Terminal output formatting for the stipple CLI.
//!
//! Provides Cargo-style status output with right-aligned coloured verbs, and
//! sets up `env_logger` so engine diagnostics share the same layout.
//! All status output goes to stderr; stdout is reserved for machine-readable output.

use std::io::{self, IsTerminal, Write};

use log::{Level, LevelFilter};

/// ANSI escape codes.
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Width for right-aligned verb column.
const VERB_WIDTH: usize = 12;

/// Terminal-aware status printer.
///
/// Prints Cargo-style status lines to stderr with optional ANSI colours.
/// Colour is enabled when stderr is a terminal.
pub struct Printer {
    color: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        Self {
            color: io::stderr().is_terminal(),
        }
    }

    /// Print a status line with a green bold verb.
    /// e.g. "   Stippling portrait.png (640x480)"
    pub fn status(&self, verb: &str, message: &str) {
        self.print_line(GREEN, verb, message);
    }

    /// Print an informational line with a cyan bold verb.
    pub fn info(&self, verb: &str, message: &str) {
        self.print_line(CYAN, verb, message);
    }

    /// Format a string as dim/grey.
    pub fn dim(&self, text: &str) -> String {
        if self.color {
            format!("{DIM}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    /// Format a string as cyan (for paths, info).
    pub fn cyan(&self, text: &str) -> String {
        if self.color {
            format!("{CYAN}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn print_line(&self, color: &str, verb: &str, message: &str) {
        let line = self.line(color, verb, message);
        let _ = writeln!(io::stderr().lock(), "{line}");
    }

    fn line(&self, color: &str, verb: &str, message: &str) -> String {
        if self.color {
            format!("{BOLD}{color}{verb:>VERB_WIDTH$}{RESET} {message}")
        } else {
            format!("{verb:>VERB_WIDTH$} {message}")
        }
    }
}

/// Map a `-v` count to a log level filter.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        _ => LevelFilter::Debug,
    }
}

/// Style a log record the way the [`Printer`] styles status lines.
///
/// Warnings and errors get coloured verbs; everything below is dim so it reads
/// as secondary to the status output.
fn log_line(printer: &Printer, level: Level, message: &str) -> String {
    match level {
        Level::Error => printer.line(RED, "error", message),
        Level::Warn => printer.line(YELLOW, "warning", message),
        level => {
            let verb = level.as_str().to_lowercase();
            printer.line(CYAN, &verb, &printer.dim(message))
        }
    }
}

/// Install the stderr logger for this crate's targets. Calling this more than
/// once keeps the first logger.
pub fn init_logging(verbosity: u8) {
    let printer = Printer::new();
    let _ = env_logger::Builder::new()
        .filter_module("stipple", level_for_verbosity(verbosity))
        .target(env_logger::Target::Stderr)
        .format(move |buf, record| {
            writeln!(
                buf,
                "{}",
                log_line(&printer, record.level(), &record.args().to_string())
            )
        })
        .try_init();
}

/// Pluralize a count: `plural(1, "point", "points")` → "1 point".
pub fn plural(n: usize, singular: &str, pluralized: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}", n, pluralized)
    }
}

/// Return a relative display path when possible, absolute otherwise.
pub fn display_path(path: &std::path::Path) -> String {
    if let Ok(cwd) = std::env::current_dir() {
        if let Ok(relative) = path.strip_prefix(&cwd) {
            let s = relative.display().to_string();
            if s.is_empty() {
                return ".".to_string();
            }
            return s;
        }
    }
    path.display().to_string()
}
