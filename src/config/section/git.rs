//! `[git]` section configuration.
//!
//! ```toml
//! [git]
//! path = "server-data"        # working tree, relative to deploy.toml
//! remote = "origin"           # optional
//! branch = "master"           # optional, requires remote
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

const PATH: FieldPath = FieldPath::new("git.path");
const BRANCH: FieldPath = FieldPath::new("git.branch");

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Working tree that `git pull` runs in.
    pub path: PathBuf,

    /// Remote to pull from. Uses the branch's upstream when unset.
    pub remote: Option<String>,

    /// Branch to pull.
    pub branch: Option<String>,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            remote: None,
            branch: None,
        }
    }
}

impl GitConfig {
    /// Extra arguments for `git pull`.
    pub fn pull_args(&self) -> Vec<&str> {
        match (&self.remote, &self.branch) {
            (Some(remote), Some(branch)) => vec![remote, branch],
            (Some(remote), None) => vec![remote],
            _ => Vec::new(),
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.path.is_dir() {
            diag.error(
                PATH,
                format!("working tree not found: {}", self.path.display()),
            );
        }
        if self.branch.is_some() && self.remote.is_none() {
            diag.error_with_hint(
                BRANCH,
                "branch is set without a remote",
                "set `git.remote` as well, e.g. \"origin\"",
            );
        }
    }
}
