//! Actor Message Definitions
//!
//! ```text
//! FsActor --ResourceChanged--> RestartActor --restart <id>--> CommandSink
//! ```

use crate::resource::ResourceId;

/// Messages to Restart Actor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestartMsg {
    /// A change was resolved to this resource
    ResourceChanged(ResourceId),
    /// Stop the actor (pending restarts are dropped)
    Shutdown,
}
