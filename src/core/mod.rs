//! Core types shared across the codebase.

mod category;
mod state;

pub use category::FileKind;
pub use state::{is_shutdown, register_server, setup_shutdown_handler};
