use anyhow::Result;
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use crate::actor::fs::FsActor;
use crate::actor::messages::RestartMsg;
use crate::actor::restart::RestartActor;

/// Run all actors concurrently.
pub(super) async fn run_actors(
    fs: FsActor,
    restart: RestartActor,
    restart_tx: mpsc::Sender<RestartMsg>,
    shutdown_rx: Option<Receiver<()>>,
) -> Result<()> {
    let mut restart_handle = tokio::spawn(async move { restart.run().await });
    let mut fs_handle = tokio::spawn(async move { fs.run().await });

    if let Some(rx) = shutdown_rx {
        loop {
            if rx.try_recv().is_ok() {
                crate::debug!("actor"; "shutdown signal received");
                break;
            }
            if fs_handle.is_finished() || restart_handle.is_finished() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        }
    } else {
        tokio::select! {
            _ = &mut fs_handle => {}
            _ = &mut restart_handle => {}
        }
    }

    fs_handle.abort();

    crate::debug!("actor"; "sending shutdown to restart");
    let _ = restart_tx.send(RestartMsg::Shutdown).await;

    let _ = tokio::time::timeout(std::time::Duration::from_millis(500), restart_handle).await;

    Ok(())
}
