//! Actor Coordinator - Wires up the Watch Actor System
//!
//! The Coordinator is a thin orchestrator that:
//! - Creates communication channels
//! - Attaches the watcher up front (startup errors stay fatal)
//! - Runs the actors concurrently on a tokio runtime

mod runtime;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::fs::FsActor;
use super::messages::RestartMsg;
use super::restart::RestartActor;
use crate::rcon::CommandSink;
use crate::resource::ResourceResolver;

const CHANNEL_BUFFER: usize = 32;

/// Coordinator - wires up and runs the actor system.
pub struct Coordinator {
    fs: FsActor,
    restart: RestartActor,
    restart_tx: mpsc::Sender<RestartMsg>,
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    /// Attach the watcher and build the actors.
    pub fn new(
        resolver: ResourceResolver,
        delay: Duration,
        sink: Arc<dyn CommandSink>,
    ) -> Result<Self> {
        let (restart_tx, restart_rx) = mpsc::channel::<RestartMsg>(CHANNEL_BUFFER);

        let root = resolver.root().to_path_buf();
        let fs = FsActor::new(resolver, restart_tx.clone())
            .map_err(|e| anyhow!("watcher failed on {}: {}", root.display(), e))?;
        let restart = RestartActor::new(restart_rx, delay, sink);

        Ok(Self {
            fs,
            restart,
            restart_tx,
            shutdown_rx: None,
        })
    }

    /// Set shutdown signal receiver.
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system.
    pub async fn run(self) -> Result<()> {
        crate::debug!("actor"; "start");
        runtime::run_actors(self.fs, self.restart, self.restart_tx, self.shutdown_rx).await?;
        crate::debug!("actor"; "stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rcon::testing::RecordingSink;
    use crate::resource::DEFAULT_MANIFESTS;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_missing_root_fails_startup() {
        let temp = TempDir::new().unwrap();
        let resolver = ResourceResolver::new(
            temp.path().join("missing"),
            DEFAULT_MANIFESTS.iter().copied(),
        );
        let sink = Arc::new(RecordingSink::new());

        let Err(err) = Coordinator::new(resolver, Duration::from_millis(300), sink) else {
            panic!("watching a missing root should fail");
        };
        assert!(format!("{err:#}").contains("watcher failed on"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_changes_restart_owning_resources() {
        let temp = TempDir::new().unwrap();
        let root = fs::canonicalize(temp.path()).unwrap();
        write(&root.join("a/fxmanifest.lua"), "");
        write(&root.join("a/client/main.lua"), "");
        write(&root.join("b/__resource.lua"), "");
        write(&root.join("b/s.lua"), "");
        write(&root.join("readme.txt"), "");

        let sink = Arc::new(RecordingSink::new());
        let resolver = ResourceResolver::new(&root, DEFAULT_MANIFESTS.iter().copied());
        let (shutdown_tx, shutdown_rx) = crossbeam::channel::unbounded();
        let coordinator = Coordinator::new(resolver, Duration::from_millis(300), sink.clone())
            .unwrap()
            .with_shutdown_signal(shutdown_rx);
        let handle = tokio::spawn(coordinator.run());

        tokio::time::sleep(Duration::from_millis(200)).await;
        write(&root.join("a/client/main.lua"), "print('a')");
        write(&root.join("b/s.lua"), "print('b')");
        write(&root.join("a/client/main.lua"), "print('a2')");
        write(&root.join("readme.txt"), "notes");

        // One window plus slack for the watcher backend
        let mut waited = Duration::ZERO;
        while sink.sent().is_empty() && waited < Duration::from_secs(5) {
            tokio::time::sleep(Duration::from_millis(50)).await;
            waited += Duration::from_millis(50);
        }
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(sink.sent(), ["restart a", "restart b"]);

        shutdown_tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("actors did not stop")
            .unwrap()
            .unwrap();
    }
}
