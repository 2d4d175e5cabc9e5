//! FileSystem Actor
//!
//! Watches the resource tree and reports every changed resource to the
//! RestartActor. Implements the "Watcher-First" pattern: the watcher is
//! attached in [`FsActor::new`], so events are buffered from that point on and
//! a missing root fails startup instead of the actor task.
//!
//! Architecture:
//! ```text
//! Watcher → filter (update-only, no hidden/backup) → ResourceResolver → RestartMsg
//! ```

use std::time::Duration;

use notify::RecommendedWatcher;
use tokio::sync::mpsc;

use super::messages::RestartMsg;
use crate::resource::ResourceResolver;

// Event kind and path filtering.
mod filter;
// Raw events -> resource ids.
mod router;
// Root attach/re-attach lifecycle.
mod watch_root;


use router::resources_for_event;
use watch_root::WatchRoot;

/// How often the watch root is checked for removal/recreation.
const MAINTAIN_INTERVAL: Duration = Duration::from_secs(2);

/// FileSystem Actor - watches for resource changes
pub struct FsActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    watcher: RecommendedWatcher,
    /// Watch-root consistency layer
    watch_root: WatchRoot,
    /// Maps changed paths to resources
    resolver: ResourceResolver,
    /// Channel to send messages to RestartActor
    restart_tx: mpsc::Sender<RestartMsg>,
}

impl FsActor {
    /// Create a new FsActor and start watching the resolver's root.
    pub fn new(
        resolver: ResourceResolver,
        restart_tx: mpsc::Sender<RestartMsg>,
    ) -> notify::Result<Self> {
        // Create sync channel for notify (it doesn't support async)
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        let mut watch_root = WatchRoot::new(resolver.root().to_path_buf());
        watch_root.attach(&mut watcher)?;
        crate::log!("watch"; "{}", watch_root.path().display());

        Ok(Self {
            notify_rx,
            watcher,
            watch_root,
            resolver,
            restart_tx,
        })
    }

    /// Run the actor event loop
    pub async fn run(self) {
        let notify_rx = self.notify_rx;
        let restart_tx = self.restart_tx;
        let resolver = self.resolver;
        let mut watcher = self.watcher;
        let mut watch_root = self.watch_root;

        let (async_tx, mut async_rx) = tokio::sync::mpsc::channel::<notify::Event>(64);

        // Spawn a thread to poll notify events and send to async channel
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break; // Receiver dropped
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        let mut maintain = tokio::time::interval(MAINTAIN_INTERVAL);
        maintain.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                Some(event) = async_rx.recv() => {
                    for id in resources_for_event(&event, &resolver) {
                        crate::debug!("watch"; "changed: {}", id);
                        if restart_tx.send(RestartMsg::ResourceChanged(id)).await.is_err() {
                            return; // RestartActor shut down
                        }
                    }
                }
                _ = maintain.tick() => watch_root.maintain(&mut watcher),
            }
        }
    }
}
