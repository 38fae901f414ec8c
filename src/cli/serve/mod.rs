//! Development server with live reload support.

mod content;
mod lifecycle;
mod path;
mod response;


use crate::{
    compiler::StyleCompiler,
    config::{DEFAULT_WS_PORT, DevConfig, cfg},
    core::FileKind,
    log, logger,
};
use anyhow::{Context, Result};
use crossbeam::channel;
use path::Route;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};
use tiny_http::{Request, Server};

/// Request handler threads
const POOL_THREADS: usize = 4;

/// Actual WebSocket port (may differ from the configured one if it was in use)
/// Updated by coordinator after WebSocket server binds successfully
static ACTUAL_WS_PORT: AtomicU16 = AtomicU16::new(DEFAULT_WS_PORT);

/// Update the actual WebSocket port (called by coordinator after binding)
pub fn set_actual_ws_port(port: u16) {
    ACTUAL_WS_PORT.store(port, Ordering::Relaxed);
}

/// Get the actual WebSocket port
fn get_actual_ws_port() -> u16 {
    ACTUAL_WS_PORT.load(Ordering::Relaxed)
}

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    addr: SocketAddr,
    compiler: Arc<StyleCompiler>,
    shutdown_rx: channel::Receiver<()>,
}

/// Bind the HTTP server without starting the request loop
pub fn bind_server() -> Result<BoundServer> {
    let config = cfg();
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);

    set_actual_ws_port(config.serve.ws_port);

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    lifecycle::register_server_for_shutdown(Arc::clone(&server), shutdown_tx);

    Ok(BoundServer {
        server,
        addr,
        compiler: Arc::new(StyleCompiler::new(&config)),
        shutdown_rx,
    })
}

impl BoundServer {
    /// Get the bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start the actors, then the request loop (blocking).
    pub fn run(self) -> Result<()> {
        let config = cfg();
        let actor_handle = lifecycle::spawn_actors(
            Arc::clone(&config),
            Arc::clone(&self.compiler),
            self.shutdown_rx,
        );

        log!("serve"; "--> http://{}", self.addr);

        run_request_loop(&self.server, &config, &self.compiler)?;
        lifecycle::wait_for_shutdown(actor_handle);
        Ok(())
    }
}

fn run_request_loop(
    server: &Server,
    config: &Arc<DevConfig>,
    compiler: &Arc<StyleCompiler>,
) -> Result<()> {
    // A slow disk read must not hold up other requests
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(POOL_THREADS)
        .build()
        .context("failed to create request thread pool")?;

    for request in server.incoming_requests() {
        let config = Arc::clone(config);
        let compiler = Arc::clone(compiler);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &config, &compiler) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, config: &DevConfig, compiler: &StyleCompiler) -> Result<()> {
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    let url = request.url().to_string();

    match Route::from_url(&url, config.get_root()) {
        Route::Favicon => response::respond_empty(request),
        Route::NotFound => {
            logger::request_missing(&url);
            response::respond_not_found(request)
        }
        Route::File(path) => {
            logger::request_ok(&url);
            if FileKind::classify(&path, &config.watch) == FileKind::Markup {
                let css = compiler.css();
                let ws_port = config.serve.watch.then(get_actual_ws_port);
                response::respond_file(request, &path, Some((css.as_str(), ws_port)))
            } else {
                response::respond_file(request, &path, None)
            }
        }
    }
}
