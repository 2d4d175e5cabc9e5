//! Restart Actor
//!
//! Collects resources reported by the FsActor and restarts them in batches.
//!
//! ```text
//! ResourceChanged → Coalescer (pending set + fixed window) → dispatch → CommandSink
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use super::messages::RestartMsg;
use crate::rcon::CommandSink;
use crate::resource::ResourceId;

// Pending set and flush timer.
mod coalescer;
// Batch → restart commands.
mod dispatch;


pub use coalescer::{Coalescer, DEFAULT_DELAY_MS};
pub use dispatch::dispatch;

/// Restart Actor - owns the coalescer, the only place it is mutated
pub struct RestartActor {
    rx: mpsc::Receiver<RestartMsg>,
    coalescer: Coalescer,
    sink: Arc<dyn CommandSink>,
}

impl RestartActor {
    pub fn new(rx: mpsc::Receiver<RestartMsg>, delay: Duration, sink: Arc<dyn CommandSink>) -> Self {
        Self {
            rx,
            coalescer: Coalescer::new(delay),
            sink,
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        loop {
            // Checked up front so a constant event stream cannot starve the flush
            if self.coalescer.is_due(now()) {
                self.flush();
            }

            let sleep = self.coalescer.sleep_duration(now());
            tokio::select! {
                biased;
                msg = self.rx.recv() => match msg {
                    Some(RestartMsg::ResourceChanged(id)) => self.enqueue(id),
                    Some(RestartMsg::Shutdown) | None => break,
                },
                _ = tokio::time::sleep(sleep) => self.flush(),
            }
        }

        if !self.coalescer.pending().is_empty() {
            crate::debug!("restart"; "dropping {} pending restart(s)", self.coalescer.pending().len());
        }
    }

    fn enqueue(&mut self, id: ResourceId) {
        crate::debug!("restart"; "queued {}", id);
        if self.coalescer.add(id, now()) {
            crate::debug!("restart"; "window armed ({:?})", self.coalescer.sleep_duration(now()));
        }
    }

    fn flush(&mut self) {
        let Some(batch) = self.coalescer.flush(now()) else {
            return;
        };

        let names: Vec<_> = batch.iter().map(|id| id.as_str()).collect();
        crate::log!("restart"; "{}", names.join(", "));

        let sent = dispatch(self.sink.as_ref(), &batch);
        if sent < batch.len() {
            crate::log!("restart"; "{} of {} restart(s) not delivered", batch.len() - sent, batch.len());
        }

        self.coalescer.settle(now());
    }
}

/// Current time on the tokio clock (pausable in tests).
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}
