//! Configuration section definitions.
//!
//! Each module corresponds to a section in `twdev.toml`:
//!
//! | Module     | TOML Section   | Purpose                              |
//! |------------|----------------|--------------------------------------|
//! | `compiler` | `[compiler]`   | CSS compiler invocation              |
//! | `serve`    | `[serve]`      | Development server and push channel  |
//! | `watch`    | `[watch]`      | File classification                  |

mod compiler;
mod serve;
mod watch;

pub use compiler::{CompilerConfig, FailurePolicy};
pub use serve::{DEFAULT_WS_PORT, ServeConfig};
pub use watch::WatchConfig;
