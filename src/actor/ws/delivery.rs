use std::io::ErrorKind;

use tungstenite::protocol::Message;

use crate::reload::message::HotReloadMessage;

use super::WsActor;

impl WsActor {
    /// Broadcast a message to all connected clients, dropping dead ones
    pub(super) fn broadcast(&self, msg: &HotReloadMessage) {
        let mut clients = self.clients.lock();
        let count = clients.len();

        if count == 0 {
            crate::debug!("ws"; "no clients connected");
            return;
        }

        let frame = Message::Text(msg.to_json().into());
        clients.retain_mut(|ws| {
            // Sends block; reads stay non-blocking for the reader thread
            let _ = ws.get_ref().set_nonblocking(false);
            let sent = ws.send(frame.clone());
            let _ = ws.get_ref().set_nonblocking(true);

            match sent {
                Ok(_) => true,
                Err(tungstenite::Error::Io(ref e)) if e.kind() == ErrorKind::WouldBlock => true,
                Err(e) => {
                    crate::debug!("ws"; "client disconnected: {}", e);
                    false
                }
            }
        });
        crate::debug!("ws"; "broadcast to {} clients", clients.len());
    }
}
