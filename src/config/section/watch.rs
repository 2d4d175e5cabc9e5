//! `[watch]` section configuration.
//!
//! Restart resources whose files change on disk.
//!
//! # Example
//!
//! ```toml
//! [watch]
//! enable = true
//! root = "server-data/resources"          # relative to deploy.toml
//! delay_ms = 3000                         # coalescing window
//! manifests = ["fxmanifest.lua", "__resource.lua"]
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::actor::restart::DEFAULT_DELAY_MS;
use crate::config::{ConfigDiagnostics, FieldPath};
use crate::resource::{DEFAULT_MANIFESTS, ResourceResolver};

const ROOT: FieldPath = FieldPath::new("watch.root");
const MANIFESTS: FieldPath = FieldPath::new("watch.manifests");

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Enable the resource watcher in `serve`.
    pub enable: bool,

    /// Directory holding the resources.
    pub root: PathBuf,

    /// Coalescing window in milliseconds.
    pub delay_ms: u64,

    /// File names that mark a resource directory.
    pub manifests: Vec<String>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            enable: true,
            root: PathBuf::from("resources"),
            delay_ms: DEFAULT_DELAY_MS,
            manifests: DEFAULT_MANIFESTS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl WatchConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn resolver(&self) -> ResourceResolver {
        ResourceResolver::new(&self.root, self.manifests.iter().cloned())
    }

    /// Checked by every command that resolves paths.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.root.exists() {
            diag.error(ROOT, format!("directory not found: {}", self.root.display()));
        } else if !self.root.is_dir() {
            diag.error(ROOT, format!("not a directory: {}", self.root.display()));
        }

        if self.manifests.is_empty() {
            diag.error_with_hint(
                MANIFESTS,
                "no manifest file names",
                "use the default [\"fxmanifest.lua\", \"__resource.lua\"]",
            );
        }
        for name in &self.manifests {
            if name.is_empty() || name.contains(['/', '\\']) {
                diag.error(
                    MANIFESTS,
                    format!("`{name}` must be a plain file name"),
                );
            }
        }
    }
}
