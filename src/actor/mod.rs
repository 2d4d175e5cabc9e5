//! Actor System for Resource Watching
//!
//! Message-passing concurrency for watch mode:
//!
//! ```text
//! FsActor --> RestartActor --> CommandSink
//! (watch)     (coalesce)       (rcon)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `fs` - File system watcher, resolves changes to resources
//! - `restart` - Coalesces resources and dispatches restarts
//! - `coordinator` - Wires up and runs actors

pub mod coordinator;
pub mod fs;
pub mod messages;
pub mod restart;

pub use coordinator::Coordinator;
