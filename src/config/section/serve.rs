//! `[serve]` section configuration.
//!
//! Contains development server settings.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"     # Network interface (127.0.0.1 = localhost only)
//! port = 8080                 # HTTP port number
//! watch = true                # Recompile and reload on file changes
//! ws_port = 35729             # Live reload push channel port
//! ```
//!
//! Use `interface = "0.0.0.0"` to make the server accessible from LAN.

use std::net::{IpAddr, Ipv4Addr};

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default WebSocket port for live reload.
pub const DEFAULT_WS_PORT: u16 = 35729;

/// Development server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,

    /// Enable file watcher for recompile and live reload.
    pub watch: bool,

    /// Port of the live reload WebSocket server.
    pub ws_port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: DEFAULT_PORT,
            watch: true,
            ws_port: DEFAULT_WS_PORT,
        }
    }
}

impl ServeConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.port == 0 {
            diag.error("serve.port", "port must be non-zero");
        }
        if self.ws_port == 0 {
            diag.error("serve.ws_port", "port must be non-zero");
        }
        if self.watch && self.port == self.ws_port {
            diag.error_with_hint(
                "serve.ws_port",
                format!("live reload port collides with serve.port ({})", self.port),
                "pick a different serve.ws_port",
            );
        }
    }
}
