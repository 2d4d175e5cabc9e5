//! Remote console command sink.
//!
//! Everything that wants the game server to act goes through a
//! [`CommandSink`]: the restart actor for coalesced restarts, and the webhook
//! and `/refresh` handlers for full refreshes. Sends are fire-and-forget; a
//! failed send is reported to the caller and never retried.
//!
//! ```text
//! RestartActor ──┐
//!                ├──> Arc<dyn CommandSink> ──> UdpRcon ──> game server
//! HTTP handlers ─┘
//! ```

mod packet;
mod udp;

#[cfg(test)]
pub mod testing;

pub use udp::UdpRcon;

use std::fmt;
use std::io;
use std::net::SocketAddr;

use thiserror::Error;

use crate::resource::ResourceId;

/// A console command understood by the game server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Rescan the resource directories.
    Refresh,
    /// Stop and start a single resource.
    Restart(ResourceId),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Refresh => f.write_str("refresh"),
            Self::Restart(id) => write!(f, "restart {id}"),
        }
    }
}

/// Destination for console commands.
pub trait CommandSink: Send + Sync {
    fn send(&self, command: &Command) -> Result<(), RconError>;
}

/// Remote console errors.
#[derive(Debug, Error)]
pub enum RconError {
    #[error("cannot resolve rcon address `{0}`")]
    Resolve(String, #[source] io::Error),

    #[error("rcon address `{0}` resolved to nothing")]
    NoAddress(String),

    #[error("failed to open rcon socket")]
    Socket(#[source] io::Error),

    #[error("failed to send `{command}` to {addr}")]
    Send {
        command: String,
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
}
