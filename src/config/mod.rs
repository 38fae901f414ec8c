//! Configuration management for `twdev.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [serve], [compiler], [watch]
//! ├── types/         # ConfigError, ConfigDiagnostics, global handle
//! └── mod.rs         # DevConfig (this file)
//! ```
//!
//! The config file is optional: without it the server runs the fixed
//! invocation `./node_modules/.bin/tailwind build style.css -c tailwind.js`
//! and listens on port 8080.
//!
//! Precedence: CLI flags > config file > defaults.

pub mod section;
pub mod types;

pub use section::{CompilerConfig, DEFAULT_WS_PORT, FailurePolicy, ServeConfig, WatchConfig};
pub use types::{ConfigDiagnostics, ConfigError, cfg, init_config};

use crate::{cli::Cli, log};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing `twdev.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DevConfig {
    /// Absolute path to the config file, which may not exist (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory, watched and served (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// CSS compiler invocation
    #[serde(default)]
    pub compiler: CompilerConfig,

    /// File classification
    #[serde(default)]
    pub watch: WatchConfig,
}

impl DevConfig {
    /// Load configuration from CLI arguments.
    ///
    /// The project root is `--root` or the current directory; the config
    /// file is resolved against it. A missing config file means defaults.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let root = match &cli.root {
            Some(root) => crate::utils::path::normalize_path(&cwd.join(root)),
            None => crate::utils::path::normalize_path(&cwd),
        };

        if !root.is_dir() {
            anyhow::bail!(ConfigError::Validation(format!(
                "project directory not found: {}",
                root.display()
            )));
        }

        let config_path = root.join(&cli.config);
        let mut config = if config_path.is_file() {
            Self::from_path(&config_path)?
        } else {
            crate::debug!("config"; "{} not found, using defaults", cli.config.display());
            Self::default()
        };

        if config.watch.ignore_self.is_none() {
            config.watch.ignore_self = config_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned());
        }

        config.config_path = config_path;
        config.set_root(&root);
        config.apply_cli(cli);
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    #[cfg(test)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.root = path.to_path_buf();
    }

    /// Join a path with the root directory.
    #[cfg(test)]
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply CLI overrides on top of file values.
    fn apply_cli(&mut self, cli: &Cli) {
        crate::logger::set_verbose(cli.verbose);

        Self::update_option(&mut self.serve.interface, cli.interface.as_ref());
        Self::update_option(&mut self.serve.port, cli.port.as_ref());
        Self::update_option(&mut self.serve.watch, cli.watch.as_ref());

        if let Some(compiler) = &cli.compiler {
            self.compiler.command = vec![compiler.display().to_string()];
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.serve.validate(&mut diag);
        self.compiler.validate(self.get_root(), &mut diag);
        self.watch.validate(&mut diag);

        diag.print_warnings();

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config text.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> DevConfig {
    let (parsed, ignored) = DevConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

/// Build a config rooted at `root` with a compiler command replaced by
/// `sh -c <script>`, for tests that run a stand-in compiler.
#[cfg(test)]
pub fn test_config_with_script(root: &Path, script: &str) -> DevConfig {
    let mut config = DevConfig::default();
    config.set_root(root);
    config.compiler.command = vec!["sh".into(), "-c".into(), script.into()];
    config
}

// ============================================================================
// tests
// ============================================================================
