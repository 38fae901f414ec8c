//! Actor Message Definitions
//!
//! ```text
//! FsActor --Reload/Error--> WsActor <--AddClient-- ws accept thread
//! ```

/// Messages to WebSocket Actor
#[derive(Debug)]
pub enum WsMsg {
    /// Reload every connected page
    Reload { reason: String },
    /// Compilation error (no reload)
    Error { message: String },
    /// Add client (raw stream, handshake happens in the actor)
    AddClient(std::net::TcpStream),
    /// Shutdown
    Shutdown,
}
