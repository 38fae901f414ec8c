//! External compiler process execution.
//!
//! Builder-based API over `tokio::process`: the child is spawned with both
//! output streams piped, read to completion concurrently, and judged once
//! it exits.
//!
//! # Examples
//!
//! ```ignore
//! let result = Cmd::from_slice(&["./node_modules/.bin/tailwind", "build", "style.css"])
//!     .cwd(root)
//!     .policy(FailurePolicy::Stderr)
//!     .run()
//!     .await;
//! ```

use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process::{ExitStatus, Stdio},
};

use tokio::process::Command;

use super::{CompileError, strip_marker};
use crate::config::FailurePolicy;

/// Outcome of one compiler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileResult {
    /// Compiled stylesheet text (captured stdout).
    Success(String),
    /// Error text: captured stderr with its leading marker stripped, or a
    /// message describing the exit status.
    Failure(String),
}

/// Everything a finished child process produced.
#[derive(Debug)]
pub struct Captured {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl Captured {
    /// Decide success or failure under `policy`.
    pub fn judge(self, program: &str, policy: FailurePolicy) -> CompileResult {
        let has_stderr = !self.stderr.is_empty();
        let exited_ok = self.status.success();

        let failed = match policy {
            FailurePolicy::Either => has_stderr || !exited_ok,
            FailurePolicy::Stderr => has_stderr,
            FailurePolicy::Status => !exited_ok,
        };

        if !failed {
            return CompileResult::Success(self.stdout);
        }

        if has_stderr {
            CompileResult::Failure(strip_marker(&self.stderr))
        } else {
            CompileResult::Failure(format!("`{program}` exited with {}", self.status))
        }
    }
}

// ============================================================================
// Builder API
// ============================================================================

/// Command builder for the compiler process.
#[derive(Debug, Default)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    policy: FailurePolicy,
}

impl Cmd {
    /// Create a new command builder.
    #[cfg(test)]
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            ..Default::default()
        }
    }

    /// Create from a command array (e.g., `["npx", "tailwindcss", "build"]`).
    pub fn from_slice<S: AsRef<OsStr>>(cmd: &[S]) -> Self {
        let mut iter = cmd.iter();
        let program = iter
            .next()
            .map(|s| s.as_ref().to_owned())
            .unwrap_or_default();
        let args: Vec<_> = iter.map(|s| s.as_ref().to_owned()).collect();
        Self {
            program,
            args,
            ..Default::default()
        }
    }

    /// Add multiple arguments. Empty arguments are skipped.
    #[cfg(test)]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            let arg = arg.as_ref();
            if !arg.is_empty() {
                self.args.push(arg.to_owned());
            }
        }
        self
    }

    /// Set working directory.
    pub fn cwd<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    /// Set failure detection policy.
    pub fn policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Get the program name for messages.
    fn program_name(&self) -> String {
        self.program.to_string_lossy().to_string()
    }

    /// Spawn the process and wait for it, capturing both streams.
    pub async fn capture(&self) -> Result<Captured, CompileError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }

        let spawn_err = |source| CompileError::Spawn {
            program: self.program_name(),
            source,
        };

        let child = cmd.spawn().map_err(spawn_err)?;
        let output = child.wait_with_output().await.map_err(spawn_err)?;

        Ok(Captured {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Execute and judge the result.
    ///
    /// A process that cannot be started is a `Failure` too, so it reaches
    /// the terminal and the browser like any other compile error.
    pub async fn run(self) -> CompileResult {
        let name = self.program_name();
        match self.capture().await {
            Ok(captured) => captured.judge(&name, self.policy),
            Err(e) => CompileResult::Failure(e.message()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
