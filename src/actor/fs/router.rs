use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::types::ChangeEvent;
use crate::actor::messages::WsMsg;
use crate::compiler::StyleCompiler;
use crate::config::WatchConfig;
use crate::core::FileKind;

/// What a change leads to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Action {
    /// Markup changed: reload without compiling
    Reload,
    /// Style or script changed: compile, then reload or report
    Compile,
    /// Nothing to do
    Ignore,
}

impl Action {
    pub(super) fn for_kind(kind: FileKind) -> Self {
        match kind {
            FileKind::Markup => Self::Reload,
            FileKind::Style | FileKind::Script => Self::Compile,
            FileKind::Other => Self::Ignore,
        }
    }
}

/// Routes change events to the compiler and the WebSocket actor
pub(super) struct Router {
    pub(super) watch: WatchConfig,
    pub(super) compiler: Arc<StyleCompiler>,
    pub(super) ws_tx: mpsc::Sender<WsMsg>,
}

impl Router {
    /// Act on one change.
    ///
    /// Compiles run on their own task so the next event is handled right
    /// away; the handle is returned for callers that want to wait on it.
    /// Returns `Err(())` if WsActor shut down.
    pub(super) async fn dispatch(&self, event: &ChangeEvent) -> Result<Option<JoinHandle<()>>, ()> {
        let kind = FileKind::classify(Path::new(&event.file_name), &self.watch);
        crate::debug!("watch"; "detected {}: {} ({})", event.kind.label(), event.file_name, kind.name());

        match Action::for_kind(kind) {
            Action::Reload => {
                crate::debug!("watch"; "reloading");
                self.ws_tx
                    .send(WsMsg::Reload {
                        reason: event.file_name.clone(),
                    })
                    .await
                    .map_err(|_| ())?;
                Ok(None)
            }
            Action::Compile => {
                let compiler = Arc::clone(&self.compiler);
                let ws_tx = self.ws_tx.clone();
                let reason = event.file_name.clone();
                Ok(Some(tokio::spawn(async move {
                    compile_and_notify(&compiler, &ws_tx, reason).await;
                })))
            }
            Action::Ignore => Ok(None),
        }
    }
}

/// Compile once, then push `reload` on success or `error` on failure.
///
/// Failures are also written to the terminal. A closed channel is ignored:
/// nobody is left to notify.
async fn compile_and_notify(
    compiler: &StyleCompiler,
    ws_tx: &mpsc::Sender<WsMsg>,
    reason: String,
) {
    let msg = match compiler.compile().await {
        Ok(()) => {
            crate::debug!("css"; "compiled, reloading");
            WsMsg::Reload { reason }
        }
        Err(e) => {
            let message = e.message();
            crate::logger::compile_error(&message);
            WsMsg::Error { message }
        }
    };
    let _ = ws_tx.send(msg).await;
}
