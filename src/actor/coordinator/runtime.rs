use std::time::Duration;

use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use crate::actor::fs::FsActor;
use crate::actor::messages::WsMsg;
use crate::actor::ws::WsActor;

/// Poll interval for the shutdown signal
const SHUTDOWN_POLL: Duration = Duration::from_millis(100);

/// Run all actors concurrently until shutdown.
pub(super) async fn run_actors(
    fs: FsActor,
    ws: WsActor,
    ws_tx: mpsc::Sender<WsMsg>,
    shutdown_rx: Option<Receiver<()>>,
) {
    let ws_handle = tokio::spawn(async move { ws.run().await });
    let fs_handle = tokio::spawn(async move { fs.run().await });

    if let Some(rx) = shutdown_rx {
        loop {
            if rx.try_recv().is_ok() {
                crate::debug!("actor"; "shutdown signal received");
                break;
            }
            tokio::time::sleep(SHUTDOWN_POLL).await;
        }
        fs_handle.abort();
    } else {
        let _ = fs_handle.await;
    }

    crate::debug!("actor"; "sending shutdown to ws");
    let _ = ws_tx.send(WsMsg::Shutdown).await;

    let _ = tokio::time::timeout(Duration::from_millis(500), ws_handle).await;
}
