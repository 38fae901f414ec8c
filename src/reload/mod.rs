//! Reload Module
//!
//! WebSocket-based live reload for the development server.
//!
//! ```text
//! FsActor -> StyleCompiler -> WsActor -> Browser
//!  (watch)     (tailwind)    (broadcast)
//! ```
//!
//! # Modules
//!
//! - `message` - Live reload message types (reload, error, connected)
//! - `server` - WebSocket server for client connections

pub mod message;
pub mod server;
