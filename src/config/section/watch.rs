//! `[watch]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [watch]
//! ignore_self = "twdev.toml"    # never react to edits of this file
//!                               # (default: the config file's name)
//! markup = ["html", "htm"]      # reload only
//! style = ["css"]               # recompile, then reload or error
//! script = ["js"]               # recompile, then reload or error
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

/// File classification for the watcher and the content server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// File name excluded from watching. Filled in with the config file's
    /// name when not set.
    pub ignore_self: Option<String>,
    /// Markup extensions, served with injection and reloaded on change.
    pub markup: Vec<String>,
    /// Stylesheet extensions, recompiled on change.
    pub style: Vec<String>,
    /// Script extensions, recompiled on change.
    pub script: Vec<String>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            ignore_self: None,
            markup: vec!["html".into(), "htm".into()],
            style: vec!["css".into()],
            script: vec!["js".into()],
        }
    }
}

impl WatchConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let lists = [
            ("watch.markup", &self.markup),
            ("watch.style", &self.style),
            ("watch.script", &self.script),
        ];

        for (field, list) in lists {
            if list.iter().any(|ext| ext.starts_with('.')) {
                diag.error_with_hint(
                    field,
                    "extensions must not start with a dot",
                    "write `css`, not `.css`",
                );
            }
        }

        for ext in &self.markup {
            if self.style.contains(ext) || self.script.contains(ext) {
                diag.error(
                    "watch.markup",
                    format!("`{ext}` is listed as both markup and a compiled source"),
                );
            }
        }
    }
}
