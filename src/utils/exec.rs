//! External command execution.
//!
//! A small builder over [`std::process::Command`] that logs the filtered
//! stderr of successful runs and folds the output of failed runs into the
//! returned error.
//!
//! ```ignore
//! use crate::utils::exec::Cmd;
//!
//! let output = Cmd::new("git")
//!     .args(["pull", "--ff-only"])
//!     .cwd(work_tree)
//!     .envs([("LANG", "C")])
//!     .run()?;
//! ```

use crate::log;
use anyhow::{Context, Result};
use regex::Regex;
use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process::{Command, Output},
    sync::OnceLock,
};

/// Command builder for external process execution.
#[derive(Default)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    envs: Vec<(String, String)>,
    filter: Option<&'static FilterRule>,
}

impl Cmd {
    /// Create a new command builder.
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            ..Default::default()
        }
    }

    /// Add a single argument. Empty arguments are dropped.
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        let arg = arg.as_ref();
        if !arg.is_empty() {
            self.args.push(arg.to_owned());
        }
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self = self.arg(arg);
        }
        self
    }

    /// Set working directory.
    pub fn cwd<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    /// Set environment variables for the subprocess.
    pub fn envs<K, V, I>(mut self, vars: I) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (k, v) in vars {
            self.envs.push((k.as_ref().to_owned(), v.as_ref().to_owned()));
        }
        self
    }

    /// Set output filter for logging.
    pub fn filter(mut self, filter: &'static FilterRule) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Execute the command and return output. A non-zero exit is an error.
    pub fn run(self) -> Result<Output> {
        let filter = self.filter.unwrap_or(&EMPTY_FILTER);
        let name = self.program.to_string_lossy().to_string();

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).envs(self.envs.iter().cloned());
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }

        let output = cmd
            .output()
            .with_context(|| format!("Failed to execute `{name}`"))?;

        log_output(&name, &output, filter)?;
        Ok(output)
    }
}

/// Filter rule for command output logging.
pub struct FilterRule {
    /// Prefixes to skip when logging output.
    pub skip_prefixes: &'static [&'static str],
}

impl FilterRule {
    pub const fn new(skip_prefixes: &'static [&'static str]) -> Self {
        Self { skip_prefixes }
    }

    fn should_skip(&self, line: &str) -> bool {
        line.is_empty() || self.skip_prefixes.iter().any(|p| line.starts_with(p))
    }

    /// Log output lines that pass the filter.
    pub fn log(&self, name: &str, output: &str) {
        let lines: Vec<_> = output
            .lines()
            .filter(|line| {
                let plain = strip_ansi(line);
                !self.should_skip(plain.trim())
            })
            .collect();

        if !lines.is_empty() {
            log!(name; "{}", lines.join("\n"));
        }
    }
}

/// Empty filter (no skipping).
pub const EMPTY_FILTER: FilterRule = FilterRule::new(&[]);

/// Strip ANSI escape codes from string.
fn strip_ansi(s: &str) -> std::borrow::Cow<'_, str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").expect("valid ansi regex"));
    re.replace_all(s, "")
}

fn log_output(name: &str, output: &Output, filter: &'static FilterRule) -> Result<()> {
    if !output.status.success() {
        anyhow::bail!(format_error(name, output, filter));
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    filter.log(name, stderr.trim());
    Ok(())
}

fn format_error(name: &str, output: &Output, filter: &'static FilterRule) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);

    let error_msg = filter
        .skip_prefixes
        .iter()
        .fold(stderr.trim(), |s, p| s.trim_start_matches(p).trim_start());

    let mut msg = format!("Command `{name}` failed with {}\n", output.status);
    if !error_msg.is_empty() {
        msg.push_str(error_msg);
    }

    let stdout_trimmed = stdout.trim();
    if !stdout_trimmed.is_empty() {
        msg.push_str("\nStdout:\n");
        msg.push_str(stdout_trimmed);
    }
    msg
}
