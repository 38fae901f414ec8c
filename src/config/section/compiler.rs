//! `[compiler]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [compiler]
//! command = ["./node_modules/.bin/tailwind"]
//! input = "style.css"
//! config = "tailwind.js"
//! failure = "either"
//! # Runs: ./node_modules/.bin/tailwind build style.css -c tailwind.js
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

/// How a finished compiler process is judged as failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Failed if anything was written to stderr, or the exit status is non-zero.
    #[default]
    Either,
    /// Failed only if anything was written to stderr (exit status ignored).
    Stderr,
    /// Failed only on a non-zero exit status (stderr treated as diagnostics).
    Status,
}

/// CSS compiler invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Compiler command prefix (e.g., `["npx", "tailwindcss"]`).
    pub command: Vec<String>,
    /// Stylesheet source given to the compiler.
    pub input: PathBuf,
    /// Compiler config file.
    pub config: PathBuf,
    /// Failure detection policy.
    pub failure: FailurePolicy,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            command: vec!["./node_modules/.bin/tailwind".into()],
            input: PathBuf::from("style.css"),
            config: PathBuf::from("tailwind.js"),
            failure: FailurePolicy::default(),
        }
    }
}

impl CompilerConfig {
    /// Full argument vector: `<command...> build <input> -c <config>`.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = self.command.clone();
        argv.extend([
            "build".into(),
            self.input.display().to_string(),
            "-c".into(),
            self.config.display().to_string(),
        ]);
        argv
    }

    /// Validate compiler configuration.
    ///
    /// An empty command is an error. A program that is neither on `PATH` nor
    /// an existing path under `root` is only hinted at: it may be installed
    /// after the server starts.
    pub fn validate(&self, root: &Path, diag: &mut ConfigDiagnostics) {
        let Some(cmd) = self.command.first() else {
            diag.error("compiler.command", "compiler.command is empty");
            return;
        };

        let is_package_runner = ["npx", "bunx", "pnpx", "yarn", "dlx"].contains(&cmd.as_str());
        let local = root.join(cmd);

        if which::which(cmd).is_err() && !local.is_file() {
            if is_package_runner {
                if let Some(package) = self.command.get(1) {
                    diag.hint(
                        "compiler.command",
                        format!("`{package}` via `{cmd}`, ensure package is installed"),
                    );
                }
            } else {
                diag.warn(
                    "compiler.command",
                    format!("`{cmd}` not found, compiles will fail until it is installed"),
                );
            }
        }

        if !root.join(&self.input).is_file() {
            diag.warn(
                "compiler.input",
                format!("stylesheet source not found: {}", self.input.display()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(
            config.compiler.command,
            vec!["./node_modules/.bin/tailwind"]
        );
        assert_eq!(config.compiler.input, PathBuf::from("style.css"));
        assert_eq!(config.compiler.config, PathBuf::from("tailwind.js"));
        assert_eq!(config.compiler.failure, FailurePolicy::Either);
    }

    #[test]
    fn test_argv() {
        let config = CompilerConfig::default();
        assert_eq!(
            config.argv(),
            vec![
                "./node_modules/.bin/tailwind",
                "build",
                "style.css",
                "-c",
                "tailwind.js"
            ]
        );
    }

    #[test]
    fn test_custom_command() {
        let config = test_parse_config(
            r#"
[compiler]
command = ["npx", "tailwindcss"]
input = "src/main.css"
failure = "stderr"
"#,
        );
        assert_eq!(config.compiler.command, vec!["npx", "tailwindcss"]);
        assert_eq!(config.compiler.failure, FailurePolicy::Stderr);
        assert_eq!(config.compiler.argv()[2], "build");
        assert_eq!(config.compiler.argv()[3], "src/main.css");
    }

    #[test]
    fn test_empty_command_is_error() {
        let config = test_parse_config("[compiler]\ncommand = []");
        let mut diag = ConfigDiagnostics::new();
        config.compiler.validate(Path::new("."), &mut diag);
        assert!(diag.has_errors());
    }

    #[test]
    fn test_missing_program_only_warns() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = test_parse_config("[compiler]\ncommand = [\"definitely-not-a-real-css-tool\"]");
        let mut diag = ConfigDiagnostics::new();
        config.compiler.validate(temp.path(), &mut diag);
        assert!(!diag.has_errors());
        assert_eq!(diag.warnings().len(), 2);
    }
}
