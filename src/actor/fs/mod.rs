//! FileSystem Actor
//!
//! Watches the project root (non-recursively) and acts on every change as
//! it arrives. There is no debouncing: each qualifying event triggers its
//! own reload or compile.
//!
//! Architecture:
//! ```text
//! Watcher → ChangeEvent (direct children only) → Router → Reload | compile task
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use super::messages::WsMsg;
use crate::compiler::StyleCompiler;
use crate::config::DevConfig;

// Event routing (change events -> reload or compile).
mod router;
// Shared fs event types.
mod types;

#[cfg(test)]
mod tests;

use router::Router;
use types::ChangeEvent;

/// Buffer between the notify thread and the actor
const EVENT_BUFFER: usize = 64;

/// FileSystem Actor - watches for file changes
pub struct FsActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    _watcher: RecommendedWatcher,
    /// Watched project root
    root: PathBuf,
    /// File name never reacted to
    ignore_self: Option<String>,
    router: Router,
}

impl FsActor {
    /// Create a new FsActor and start watching immediately.
    ///
    /// Events are buffered from this point on, so changes made while the
    /// caller runs the initial compile are not lost.
    pub fn new(
        config: &DevConfig,
        compiler: Arc<StyleCompiler>,
        ws_tx: mpsc::Sender<WsMsg>,
    ) -> notify::Result<Self> {
        // notify doesn't support async
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        let root = config.get_root().to_path_buf();
        watcher.watch(&root, RecursiveMode::NonRecursive)?;
        crate::debug!("watch"; "watching {}", root.display());

        Ok(Self {
            notify_rx,
            _watcher: watcher,
            root,
            ignore_self: config.watch.ignore_self.clone(),
            router: Router {
                watch: config.watch.clone(),
                compiler,
                ws_tx,
            },
        })
    }

    /// Run the actor event loop
    pub async fn run(self) {
        let notify_rx = self.notify_rx;
        let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(EVENT_BUFFER);

        // Poll notify events and forward them to the async side
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break; // Receiver dropped
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        while let Some(event) = async_rx.recv().await {
            for change in ChangeEvent::from_notify(&event, &self.root, self.ignore_self.as_deref()) {
                if self.router.dispatch(&change).await.is_err() {
                    crate::debug!("watch"; "ws actor gone, stopping");
                    return;
                }
            }
        }
    }
}
