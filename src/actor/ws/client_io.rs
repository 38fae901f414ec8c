use std::net::TcpStream;
use std::time::Duration;

use tungstenite::protocol::Message;

use crate::reload::message::HotReloadMessage;

use super::{Clients, WsActor};

/// Poll interval of the reader thread
const READ_POLL: Duration = Duration::from_millis(100);

/// Longest a connection may take to send its upgrade request
pub(super) const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(2);

impl WsActor {
    /// Add a new client connection
    pub(super) fn add_client(&self, stream: TcpStream) {
        // Blocking handshake, bounded since broadcasts share this task
        if let Err(e) = stream.set_read_timeout(Some(HANDSHAKE_TIMEOUT)) {
            crate::log!("ws"; "failed to set handshake timeout: {}", e);
            return;
        }

        match tungstenite::accept(stream) {
            Ok(mut ws) => {
                let connected = HotReloadMessage::connected();
                if let Err(e) = ws.send(Message::Text(connected.to_json().into())) {
                    crate::log!("ws"; "failed to send connected message: {}", e);
                    return;
                }

                // Non-blocking for the reader thread's polling reads
                let _ = ws.get_ref().set_read_timeout(None);
                let _ = ws.get_ref().set_nonblocking(true);

                let mut clients = self.clients.lock();
                clients.push(ws);
                crate::debug!("ws"; "client connected (total: {})", clients.len());
            }
            Err(e) => {
                crate::log!("ws"; "handshake failed: {}", e);
            }
        }
    }

    /// Background thread that drains client frames and prunes closed clients.
    ///
    /// Clients never send anything meaningful; reading is only needed to
    /// answer pings and notice close frames.
    pub(super) fn client_reader_loop(clients: Clients) {
        while !crate::core::is_shutdown() {
            std::thread::sleep(READ_POLL);

            let mut clients = clients.lock();
            let before = clients.len();

            clients.retain_mut(|ws| match ws.read() {
                Ok(Message::Close(_)) => false,
                Ok(_) => true,
                Err(tungstenite::Error::Io(ref e))
                    if e.kind() == std::io::ErrorKind::WouldBlock =>
                {
                    true
                }
                Err(_) => false,
            });

            if clients.len() < before {
                crate::debug!("ws"; "client disconnected (total: {})", clients.len());
            }
        }
    }
}
