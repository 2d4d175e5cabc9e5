//! Resources - the deployable units of the game server.
//!
//! A resource is a directory that directly contains a manifest file
//! (`fxmanifest.lua`, or the legacy `__resource.lua`). Resources are never
//! indexed up front; their identity is derived on demand from a changed path.
//!
//! - [`ResourceId`]: the resource name (its root directory's name)
//! - [`ResourceResolver`]: maps a changed path to its owning resource
//! - [`autostart`]: the configured list of resources restarted on refresh

pub mod autostart;
mod resolver;

pub use resolver::ResourceResolver;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Manifest file names that mark a directory as a resource root.
pub const DEFAULT_MANIFESTS: &[&str] = &["fxmanifest.lua", "__resource.lua"];

/// Name of a resource, as understood by the server console.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Derive the id from a resource root directory (its last path segment).
    pub fn from_dir(dir: &Path) -> Option<Self> {
        let name = dir.file_name()?.to_string_lossy();
        if name.is_empty() {
            return None;
        }
        Some(Self(name.into_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ResourceId {
    fn from(name: String) -> Self {
        Self(name)
    }
}
