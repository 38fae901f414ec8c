//! Stylesheet compilation.
//!
//! `StyleCompiler` owns the latest successfully compiled stylesheet and
//! runs the external compiler on request:
//!
//! ```text
//! compile() ──> Cmd::run (subprocess) ──> Success(css) ──> store, Ok(())
//!                                    └──> Failure(err) ──> keep old css, Err(err)
//! ```
//!
//! Compiles are not queued and never cancelled. Each call is numbered when
//! it starts; a result is stored only if no later-started compile has been
//! stored already, so a slow old compile cannot overwrite a newer stylesheet.

mod runner;

#[cfg(test)]
mod tests;

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use regex::Regex;
use thiserror::Error;

use crate::config::{DevConfig, FailurePolicy};

pub use runner::{Cmd, CompileResult};

/// Compilation errors.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The compiler ran and reported an error.
    #[error("{message}")]
    Failed { message: String },

    /// The compiler process could not be started or awaited.
    #[error("failed to spawn `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl CompileError {
    /// Human-readable message, including the underlying cause if any.
    pub fn message(&self) -> String {
        match self {
            Self::Failed { message } => message.clone(),
            Self::Spawn { source, .. } => format!("{self}: {source}"),
        }
    }
}

/// Owner of the compiled stylesheet.
pub struct StyleCompiler {
    /// `<command...> build <input> -c <config>`
    argv: Vec<String>,
    /// Working directory of the compiler (project root)
    cwd: PathBuf,
    policy: FailurePolicy,
    /// Latest stored stylesheet, empty until the first success
    css: ArcSwap<String>,
    /// Number of compiles started so far
    started: AtomicU64,
    /// Sequence number of the compile that produced `css`
    stored: Mutex<u64>,
}

impl StyleCompiler {
    pub fn new(config: &DevConfig) -> Self {
        Self {
            argv: config.compiler.argv(),
            cwd: config.get_root().to_path_buf(),
            policy: config.compiler.failure,
            css: ArcSwap::from_pointee(String::new()),
            started: AtomicU64::new(0),
            stored: Mutex::new(0),
        }
    }

    /// Current compiled stylesheet (a snapshot, never a partial value).
    #[inline]
    pub fn css(&self) -> Arc<String> {
        self.css.load_full()
    }

    /// Number of compiles started so far.
    pub fn compiles(&self) -> u64 {
        self.started.load(Ordering::SeqCst)
    }

    /// Run the compiler once.
    ///
    /// On success the captured stdout becomes the current stylesheet. On
    /// failure the stylesheet is left untouched and the error text is
    /// returned (stderr with its leading marker stripped, or the exit status).
    pub async fn compile(&self) -> Result<(), CompileError> {
        let seq = self.started.fetch_add(1, Ordering::SeqCst) + 1;
        crate::debug!("css"; "compiling tailwind css (#{})", seq);

        let result = Cmd::from_slice(&self.argv)
            .cwd(&self.cwd)
            .policy(self.policy)
            .run()
            .await;

        match result {
            CompileResult::Success(css) => {
                self.store(seq, css);
                Ok(())
            }
            CompileResult::Failure(message) => Err(CompileError::Failed { message }),
        }
    }

    /// Store `css` unless a later-started compile already stored its result.
    fn store(&self, seq: u64, css: String) -> bool {
        let mut stored = self.stored.lock();
        if seq < *stored {
            crate::debug!("css"; "discarding superseded compile #{}", seq);
            return false;
        }
        self.css.store(Arc::new(css));
        *stored = seq;
        true
    }
}

/// Drop everything before the first word character.
///
/// Compilers decorate their error output with a leading symbol
/// (`✖ syntax error on line 4`); the message starts at the first word.
/// Text without any word character is returned trimmed.
pub fn strip_marker(error: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(?s)\w.*").unwrap());
    match re.find(error) {
        Some(m) => m.as_str().to_string(),
        None => error.trim().to_string(),
    }
}
