//! `git pull` on the deployed working tree.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::utils::exec::{Cmd, FilterRule};

/// Progress chatter git prints to stderr on every fetch.
const GIT_FILTER: FilterRule = FilterRule::new(&["From ", " * branch", "hint:"]);

/// Result of a successful pull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullOutcome {
    /// New commits were checked out. Ids are absent when HEAD is unreadable.
    Updated {
        from: Option<String>,
        to: Option<String>,
    },
    AlreadyCurrent,
}

impl fmt::Display for PullOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyCurrent => f.write_str("already up to date"),
            Self::Updated {
                from: Some(from),
                to: Some(to),
            } => write!(f, "{}..{}", short(from), short(to)),
            Self::Updated { .. } => f.write_str("updated"),
        }
    }
}

fn short(id: &str) -> &str {
    id.get(..7).unwrap_or(id)
}

/// A checkout that can be brought up to date.
pub trait WorkTree: Send + Sync {
    fn pull(&self) -> Result<PullOutcome>;
}

/// Working tree updated by the `git` binary.
#[derive(Debug, Clone)]
pub struct GitWorkTree {
    path: PathBuf,
    args: Vec<String>,
}

impl GitWorkTree {
    /// `args` are appended to `git pull`, e.g. a remote and a branch.
    pub fn new(path: impl Into<PathBuf>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            path: path.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl WorkTree for GitWorkTree {
    fn pull(&self) -> Result<PullOutcome> {
        let before = head_id(&self.path);

        let output = Cmd::new("git")
            .arg("pull")
            .args(&self.args)
            .cwd(&self.path)
            .envs([("LANG", "C"), ("LC_ALL", "C")])
            .filter(&GIT_FILTER)
            .run()
            .with_context(|| format!("git pull in {}", self.path.display()))?;

        let after = head_id(&self.path);
        let stdout = String::from_utf8_lossy(&output.stdout);
        crate::debug!("git"; "{}", stdout.trim());

        Ok(classify(before, after, &stdout))
    }
}

/// Current HEAD commit, if the repository and HEAD are readable.
fn head_id(path: &Path) -> Option<String> {
    let repo = match gix::open(path) {
        Ok(repo) => repo,
        Err(e) => {
            crate::debug!("git"; "cannot open {}: {}", path.display(), e);
            return None;
        }
    };
    repo.head_id().ok().map(|id| id.detach().to_string())
}

/// Decide whether a pull changed anything.
///
/// HEAD ids decide when both are known. Otherwise git's own message does.
fn classify(before: Option<String>, after: Option<String>, stdout: &str) -> PullOutcome {
    match (before, after) {
        (Some(before), Some(after)) if before == after => PullOutcome::AlreadyCurrent,
        (Some(before), Some(after)) => PullOutcome::Updated {
            from: Some(before),
            to: Some(after),
        },
        (before, after) => {
            let current = stdout.lines().any(|line| {
                let line = line.trim();
                line.starts_with("Already up to date") || line.starts_with("Already up-to-date")
            });
            if current {
                PullOutcome::AlreadyCurrent
            } else {
                PullOutcome::Updated {
                    from: before,
                    to: after,
                }
            }
        }
    }
}
