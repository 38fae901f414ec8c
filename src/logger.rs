//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro, only printed with `--verbose`
//! - request lines (`200 /index.html`, `404 /missing.html`)
//! - `compile_error` for the emphasized compiler failure block
//!
//! # Example
//!
//! ```ignore
//! log!("serve"; "http://{}", addr);
//! debug!("watch"; "detected {}: {}", kind, name);
//! ```

use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use owo_colors::{OwoColorize, Stream, Style};
use std::{
    io::{Write, stderr, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::trace($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Log a dimmed trace line (`... message`), used by `debug!`
#[inline]
pub fn trace(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();
    let dots = paint("...", Style::new().dimmed(), Stream::Stdout);
    let message = paint(message, Style::new().italic(), Stream::Stdout);
    writeln!(stdout, "{prefix} {dots} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    let style = match module_lower {
        "serve" => Style::new().bright_blue(),
        "watch" => Style::new().bright_green(),
        "error" => Style::new().bright_red(),
        _ => Style::new().bright_yellow(),
    };
    paint(&prefix, style.bold(), Stream::Stdout)
}

/// Style `text` unless colors are disabled for `stream` (`--color never`,
/// no TTY).
pub fn paint(text: &str, style: Style, stream: Stream) -> String {
    text.if_supports_color(stream, |t| t.style(style)).to_string()
}

// ============================================================================
// Request lines
// ============================================================================

/// Print a served request: green `200` followed by the url.
pub fn request_ok(url: &str) {
    let mut stdout = stdout().lock();
    let status = paint("200", Style::new().green(), Stream::Stdout);
    writeln!(stdout, "{status} {url}").ok();
    stdout.flush().ok();
}

/// Print a missing file request: red `404` followed by the url, on stderr.
pub fn request_missing(url: &str) {
    let mut stderr = stderr().lock();
    let status = paint("404", Style::new().red(), Stream::Stderr);
    writeln!(stderr, "{status} {url}").ok();
    stderr.flush().ok();
}

// ============================================================================
// Compile errors
// ============================================================================

/// Emphasis applied to one line of a compile error block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Emphasis {
    Bold,
    Plain,
    Dim,
}

impl Emphasis {
    /// First line bold, second plain, the rest dimmed.
    const fn for_line(index: usize) -> Self {
        match index {
            0 => Self::Bold,
            1 => Self::Plain,
            _ => Self::Dim,
        }
    }

    fn paint(self, line: &str) -> String {
        match self {
            Self::Bold => paint(line, Style::new().bold(), Stream::Stderr),
            Self::Plain => line.to_string(),
            Self::Dim => paint(line, Style::new().dimmed(), Stream::Stderr),
        }
    }
}

/// Render a compile error block: red `ERR ` then the message lines with
/// progressively weaker emphasis.
fn render_compile_error(message: &str) -> String {
    let mut out = paint("ERR ", Style::new().red(), Stream::Stderr);
    for (i, line) in message.split('\n').enumerate() {
        out.push_str(&Emphasis::for_line(i).paint(line));
        out.push('\n');
    }
    out
}

/// Write a compile error block to stderr.
pub fn compile_error(message: &str) {
    let mut stderr = stderr().lock();
    write!(stderr, "{}", render_compile_error(message)).ok();
    stderr.flush().ok();
}

// ============================================================================
// Tests
// ============================================================================
