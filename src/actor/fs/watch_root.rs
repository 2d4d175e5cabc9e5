use std::path::{Path, PathBuf};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};

/// Watch-root consistency manager.
///
/// Responsibility:
/// - Attach the resource root at startup (missing root is fatal)
/// - Re-attach the root if it was removed and recreated (e.g. re-clone)
pub(super) struct WatchRoot {
    path: PathBuf,
    attached: bool,
}

impl WatchRoot {
    pub(super) fn new(path: PathBuf) -> Self {
        Self {
            path,
            attached: false,
        }
    }

    pub(super) fn path(&self) -> &Path {
        &self.path
    }

    pub(super) fn attach(&mut self, watcher: &mut RecommendedWatcher) -> notify::Result<()> {
        watcher.watch(&self.path, RecursiveMode::Recursive)?;
        self.attached = true;
        Ok(())
    }

    pub(super) fn maintain(&mut self, watcher: &mut RecommendedWatcher) {
        // Drop stale handle if the root no longer exists.
        if self.attached && !self.path.exists() {
            crate::log!("watch"; "resource root vanished: {}", self.path.display());
            let _ = watcher.unwatch(&self.path);
            self.attached = false;
        }

        if self.attached || !self.path.is_dir() {
            return;
        }

        if watcher.watch(&self.path, RecursiveMode::Recursive).is_ok() {
            self.attached = true;
            crate::log!("watch"; "re-attached watch: {}", self.path.display());
        }
    }
}
