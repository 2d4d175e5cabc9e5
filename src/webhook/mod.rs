//! Push-to-deploy.
//!
//! A verified push delivery pulls the working tree and, when new commits
//! arrived, sends a full refresh to the game server.
//!
//! ```text
//! POST /webhook → verify signature → 200 ok
//!                                  └→ (worker) git pull → refresh + auto-start restarts
//! ```

mod pull;
mod refresh;
pub mod signature;

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::rcon::CommandSink;
use crate::resource::autostart::AutoStartList;

pub use pull::{GitWorkTree, PullOutcome, WorkTree};
pub use refresh::full_refresh;
pub use signature::{Signature, SignatureError};

/// Header naming the delivery type.
pub const EVENT_HEADER: &str = "X-GitHub-Event";

/// What a deploy did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    /// Pulled new commits and sent `sent` commands.
    Refreshed { sent: usize },
    AlreadyCurrent,
    PullFailed,
}

/// Runs pull + refresh. Deploys are serialized: a second delivery waits
/// for the first pull to finish instead of racing it in the same tree.
pub struct Deployer {
    sink: Arc<dyn CommandSink>,
    auto_start: AutoStartList,
    work_tree: Box<dyn WorkTree>,
    lock: Mutex<()>,
}

impl Deployer {
    pub fn new(
        sink: Arc<dyn CommandSink>,
        auto_start: AutoStartList,
        work_tree: Box<dyn WorkTree>,
    ) -> Self {
        Self {
            sink,
            auto_start,
            work_tree,
            lock: Mutex::new(()),
        }
    }

    pub fn sink(&self) -> &dyn CommandSink {
        self.sink.as_ref()
    }

    pub fn deploy(&self) -> DeployOutcome {
        let _guard = self.lock.lock();

        match self.work_tree.pull() {
            Err(e) => {
                crate::log!("error"; "git pull failed: {:#}", e);
                DeployOutcome::PullFailed
            }
            Ok(PullOutcome::AlreadyCurrent) => {
                crate::log!("git"; "already up to date, nothing to do");
                DeployOutcome::AlreadyCurrent
            }
            Ok(outcome) => {
                crate::log!("git"; "pulled {}", outcome);
                let sent = full_refresh(self.sink.as_ref(), &self.auto_start);
                crate::log!("rcon"; "refresh + {} auto-start restart(s)", self.auto_start.len());
                DeployOutcome::Refreshed { sent }
            }
        }
    }
}

/// The parts of a push payload worth logging.
///
/// Parsed leniently: any missing field is simply absent.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PushSummary {
    pub git_ref: Option<String>,
    pub head: Option<String>,
    pub message: Option<String>,
    pub pusher: Option<String>,
}

impl PushSummary {
    /// `None` when the body is not JSON at all.
    pub fn parse(body: &[u8]) -> Option<Self> {
        let value: Value = serde_json::from_slice(body).ok()?;
        let text = |pointer: &str| {
            value
                .pointer(pointer)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        Some(Self {
            git_ref: text("/ref"),
            head: text("/head_commit/id").or_else(|| text("/after")),
            message: text("/head_commit/message")
                .map(|m| m.lines().next().unwrap_or_default().to_string()),
            pusher: text("/pusher/name"),
        })
    }
}

impl fmt::Display for PushSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.git_ref.as_deref().unwrap_or("push"))?;
        if let Some(head) = &self.head {
            write!(f, " @ {}", head.get(..7).unwrap_or(head))?;
        }
        if let Some(pusher) = &self.pusher {
            write!(f, " by {pusher}")?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}
