//! Server lifecycle management.

use crate::{actor::Coordinator, core::register_server, log};
use anyhow::{Context, Result};
use crossbeam::channel::{Receiver, Sender};
use std::{
    net::SocketAddr,
    sync::Arc,
    thread::{self, JoinHandle},
    time::Duration,
};
use tiny_http::Server;

/// How long shutdown waits for the actor thread.
const ACTOR_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// Bind to the configured interface and port.
///
/// No port fallback: the git host is configured with this exact address.
pub fn bind(interface: std::net::IpAddr, port: u16) -> Result<(Server, SocketAddr)> {
    let addr = SocketAddr::new(interface, port);
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("{}", e))
        .with_context(|| format!("Failed to bind {addr}"))?;

    // Port 0 picks a free port; report the real one
    let addr = server.server_addr().to_ip().unwrap_or(addr);
    Ok((server, addr))
}

/// Register server for graceful shutdown.
///
/// When Ctrl+C is pressed, the global handler unblocks the server and
/// notifies the actors.
pub fn register_server_for_shutdown(server: Arc<Server>, shutdown_tx: Sender<()>) {
    register_server(server, shutdown_tx);
}

/// Run the watch actors on their own thread and tokio runtime.
pub fn spawn_actors(
    coordinator: Option<Coordinator>,
    shutdown_rx: Receiver<()>,
) -> Option<JoinHandle<()>> {
    let coordinator = coordinator?;

    Some(thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                log!("error"; "failed to create tokio runtime: {}", e);
                return;
            }
        };

        rt.block_on(async {
            let coordinator = coordinator.with_shutdown_signal(shutdown_rx);
            if let Err(e) = coordinator.run().await {
                log!("actor"; "error: {}", e);
            }
        });
    }))
}

/// Wait for the actor system to shut down gracefully.
pub fn wait_for_shutdown(handle: Option<JoinHandle<()>>) {
    let Some(handle) = handle else { return };

    let step = Duration::from_millis(50);
    let mut waited = Duration::ZERO;
    while waited < ACTOR_SHUTDOWN_TIMEOUT {
        if handle.is_finished() {
            let _ = handle.join();
            return;
        }
        thread::sleep(step);
        waited += step;
    }
    crate::debug!("actor"; "did not stop in time");
}
