//! Webhook server with the resource watcher alongside.

mod lifecycle;
mod response;
mod webhook;

#[cfg(test)]
mod tests;

use crate::{
    actor::Coordinator,
    config::{BridgeConfig, cfg},
    log,
    rcon::CommandSink,
    webhook::{Deployer, GitWorkTree},
};
use anyhow::{Context, Result};
use crossbeam::channel;
use std::sync::Arc;
use tiny_http::{Method, Request, Server};

/// Worker threads for request handling (and the pulls they trigger).
const REQUEST_THREADS: usize = 4;

/// State shared by every request handler.
pub struct App {
    deployer: Deployer,
    secret: Vec<u8>,
}

impl App {
    pub fn new(deployer: Deployer, secret: impl Into<Vec<u8>>) -> Self {
        Self {
            deployer,
            secret: secret.into(),
        }
    }
}

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    shutdown_rx: channel::Receiver<()>,
}

/// Run `serve`: wire the sink, deployer and watcher, then block on requests.
pub fn serve(config: &BridgeConfig) -> Result<()> {
    let rcon = super::common::connect_rcon(&config.rcon)?;
    let _replies = rcon.spawn_reply_logger()?;
    let sink: Arc<dyn CommandSink> = Arc::new(rcon);

    let auto_start = config.server.auto_start_list()?;
    log!("serve"; "{} auto-start resource(s)", auto_start.len());
    let work_tree = GitWorkTree::new(&config.git.path, config.git.pull_args());
    let deployer = Deployer::new(Arc::clone(&sink), auto_start, Box::new(work_tree));
    let secret = config
        .webhook
        .secret()
        .context("no webhook secret configured")?;
    let app = Arc::new(App::new(deployer, secret));

    // Attach the watcher before binding so a bad root fails startup
    let coordinator = if config.watch.enable {
        Some(Coordinator::new(
            config.watch.resolver(),
            config.watch.delay(),
            Arc::clone(&sink),
        )?)
    } else {
        None
    };

    bind_server()?.run(app, coordinator)
}

/// Bind the HTTP server and register it for shutdown.
pub fn bind_server() -> Result<BoundServer> {
    let config = cfg();
    let (server, addr) = lifecycle::bind(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    lifecycle::register_server_for_shutdown(Arc::clone(&server), shutdown_tx);

    log!("serve"; "http://{}", addr);

    Ok(BoundServer {
        server,
        shutdown_rx,
    })
}

impl BoundServer {
    /// Start the request loop (blocking).
    pub fn run(self, app: Arc<App>, coordinator: Option<Coordinator>) -> Result<()> {
        let actor_handle = lifecycle::spawn_actors(coordinator, self.shutdown_rx);
        run_request_loop(&self.server, app)?;
        lifecycle::wait_for_shutdown(actor_handle);
        Ok(())
    }
}

fn run_request_loop(server: &Server, app: Arc<App>) -> Result<()> {
    // A pull runs on the worker that answered its webhook
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(REQUEST_THREADS)
        .build()
        .context("failed to create request thread pool")?;

    for request in server.incoming_requests() {
        let app = Arc::clone(&app);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &app) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// Routes the bridge answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Webhook,
    Refresh,
    NotFound,
}

impl Route {
    fn of(method: &Method, url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let path = path.strip_suffix('/').filter(|p| !p.is_empty()).unwrap_or(path);

        match (method, path) {
            (Method::Post, "/webhook") => Self::Webhook,
            (Method::Get | Method::Head, "/refresh") => Self::Refresh,
            _ => Self::NotFound,
        }
    }
}

/// Handle a single HTTP request
fn handle_request(request: Request, app: &App) -> Result<()> {
    // Early exit if shutdown requested
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    match Route::of(request.method(), request.url()) {
        Route::Webhook => webhook::handle_webhook(request, app),
        Route::Refresh => webhook::handle_refresh(request, app),
        Route::NotFound => {
            crate::debug!("serve"; "404 {} {}", request.method(), request.url());
            response::respond_not_found(request)
        }
    }
}
