//! Actor Coordinator - Wires up the Live Reload Actor System
//!
//! The Coordinator is a thin orchestrator that:
//! - Starts the WebSocket server and the file watcher
//! - Runs the initial stylesheet compile
//! - Runs the actors until shutdown
//!
//! The watcher is started before the initial compile so edits made while
//! it runs are still seen.

mod runtime;

use std::sync::Arc;

use anyhow::Result;
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::fs::FsActor;
use super::messages::WsMsg;
use super::ws::WsActor;
use crate::compiler::StyleCompiler;
use crate::config::DevConfig;

const CHANNEL_BUFFER: usize = 32;

/// Coordinator - wires up and runs the actor system.
pub struct Coordinator {
    config: Arc<DevConfig>,
    compiler: Arc<StyleCompiler>,
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    pub fn new(config: Arc<DevConfig>, compiler: Arc<StyleCompiler>) -> Self {
        Self {
            config,
            compiler,
            shutdown_rx: None,
        }
    }

    /// Set shutdown signal receiver.
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system.
    ///
    /// With watching disabled only the initial compile runs.
    pub async fn run(mut self) -> Result<()> {
        if !self.config.serve.watch {
            initial_compile(&self.compiler).await;
            return Ok(());
        }

        let (ws_tx, ws_rx) = mpsc::channel::<WsMsg>(CHANNEL_BUFFER);

        let serve = &self.config.serve;
        match crate::reload::server::start_ws_server_with_channel(
            serve.interface,
            serve.ws_port,
            ws_tx.clone(),
        ) {
            Ok(actual_port) => {
                crate::cli::serve::set_actual_ws_port(actual_port);
                crate::debug!("reload"; "ws://{}:{}", serve.interface, actual_port);
            }
            Err(e) => {
                crate::log!("actor"; "websocket server failed: {}", e);
            }
        }

        let fs_actor = FsActor::new(&self.config, Arc::clone(&self.compiler), ws_tx.clone())
            .map_err(|e| anyhow::anyhow!("watcher failed: {}", e))?;
        let ws_actor = WsActor::new(ws_rx);

        initial_compile(&self.compiler).await;

        crate::debug!("actor"; "start");
        let shutdown_rx = self.shutdown_rx.take();
        runtime::run_actors(fs_actor, ws_actor, ws_tx, shutdown_rx).await;

        crate::debug!("actor"; "stopped");
        Ok(())
    }
}

/// First compile at startup. Nobody is connected yet, so a failure only
/// goes to the terminal.
async fn initial_compile(compiler: &StyleCompiler) {
    if let Err(e) = compiler.compile().await {
        crate::logger::compile_error(&e.message());
    }
}
