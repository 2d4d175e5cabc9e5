//! Shutdown state for serve mode.
//!
//! - `SHUTDOWN`: Has shutdown been requested? (Ctrl+C received)
//! - `SERVER`: HTTP server to unblock on shutdown
//! - `SHUTDOWN_TX`: Wakes the actor system

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use tiny_http::Server;

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// HTTP server reference for graceful shutdown
static SERVER: OnceLock<Arc<Server>> = OnceLock::new();

/// Shutdown signal sender for actor system
static SHUTDOWN_TX: OnceLock<crossbeam::channel::Sender<()>> = OnceLock::new();

/// Setup the global Ctrl+C handler. Call once at program start
///
/// The handler behavior depends on whether a server has been registered:
/// - Before `register_server()`: process exits immediately
/// - After `register_server()`: graceful shutdown (unblock server, notify actors)
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        if SERVER.get().is_none() {
            std::process::exit(0);
        }
        crate::log!("serve"; "shutting down...");
        request_shutdown();
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the HTTP server for graceful shutdown
///
/// Call this after binding the server, before entering the request loop
pub fn register_server(server: Arc<Server>, shutdown_tx: crossbeam::channel::Sender<()>) {
    let _ = SERVER.set(server);
    let _ = SHUTDOWN_TX.set(shutdown_tx);
}

/// Flag shutdown, notify the actors and unblock the server.
pub fn request_shutdown() {
    SHUTDOWN.store(true, Ordering::SeqCst);

    if let Some(tx) = SHUTDOWN_TX.get() {
        let _ = tx.send(());
    }
    if let Some(server) = SERVER.get() {
        server.unblock();
    }
}

/// Check if shutdown has been requested
///
/// Relaxed ordering: a worker may handle one more request before noticing.
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}
