//! Bridge configuration management for `deploy.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── git        # [git]
//! │   ├── rcon       # [rcon]
//! │   ├── serve      # [serve]
//! │   ├── server     # [server]
//! │   ├── watch      # [watch]
//! │   └── webhook    # [webhook]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   ├── field      # FieldPath
//! │   └── handle     # Global config handle
//! └── mod.rs         # BridgeConfig (this file)
//! ```
//!
//! Relative paths in the file are resolved against the directory holding
//! `deploy.toml`, so the bridge behaves the same from any working directory.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{GitConfig, RconConfig, ServeConfig, ServerConfig, WatchConfig, WebhookConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath, cfg, init_config};

use crate::{
    cli::{Cli, Commands},
    log,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing deploy.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// CLI arguments reference (internal use only)
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory holding the config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub serve: ServeConfig,

    #[serde(default)]
    pub webhook: WebhookConfig,

    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub rcon: RconConfig,

    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

impl BridgeConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. The config file's
    /// parent directory becomes the root for relative paths.
    pub fn load(cli: &'static Cli) -> Result<Self> {
        let config_path = find_config_file(&cli.config).ok_or_else(|| {
            ConfigError::Validation(format!(
                "config file '{}' not found in this directory or any parent",
                cli.config.display()
            ))
        })?;

        let mut config = Self::from_path(&config_path)?;
        config.config_path = config_path;
        config.cli = Some(cli);
        config.finalize(cli);
        config.validate(&cli.command)?;

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Unknown fields are reported and skipped; the bridge runs unattended.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Finalize configuration after loading.
    fn finalize(&mut self, cli: &Cli) {
        let root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        self.normalize_paths(&root);
        self.apply_command_options(cli);
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        if let Commands::Serve {
            interface,
            port,
            watch,
        } = &cli.command
        {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
            Self::update_option(&mut self.watch.enable, watch.as_ref());
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    /// Normalize all paths relative to root directory.
    fn normalize_paths(&mut self, root: &Path) {
        let root = crate::utils::path::normalize_path(root);
        self.config_path = crate::utils::path::normalize_path(&self.config_path);

        self.git.path = Self::normalize_user_path(&self.git.path, &root);
        self.watch.root = Self::normalize_user_path(&self.watch.root, &root);
        if let Some(file) = self.server.config_file.take() {
            self.server.config_file = Some(Self::normalize_user_path(&file, &root));
        }

        self.root = root;
    }

    /// Expand `~` and resolve relative paths against the config directory.
    fn normalize_user_path(path: &Path, root: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
        let path = PathBuf::from(expanded);
        let full_path = if path.is_relative() {
            root.join(&path)
        } else {
            path
        };
        crate::utils::path::normalize_path(&full_path)
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate the sections the command will use.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self, command: &Commands) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        match command {
            Commands::Serve { .. } => {
                self.webhook.validate(&mut diag);
                self.git.validate(&mut diag);
                self.rcon.validate(&mut diag);
                self.server.validate(&mut diag);
                if self.watch.enable {
                    self.watch.validate(&mut diag);
                }
            }
            Commands::Refresh => {
                self.rcon.validate(&mut diag);
                self.server.validate(&mut diag);
            }
            Commands::Restart { .. } => self.rcon.validate(&mut diag),
            Commands::Resolve { .. } => self.watch.validate(&mut diag),
        }

        diag.print_warnings();
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse a config snippet.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> BridgeConfig {
    let (parsed, ignored) = BridgeConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FULL: &str = r#"
[serve]
interface = "0.0.0.0"
port = 8080

[webhook]
secret = "s3cret"

[git]
path = "server-data"

[rcon]
host = "127.0.0.1"
port = 30120
password = "pw"

[watch]
enable = true
root = "server-data/resources"
delay_ms = 3000
manifests = ["fxmanifest.lua", "__resource.lua"]

[server]
auto_start = ["chat", "spawnmanager"]
"#;

    fn leak_cli(args: &[&str]) -> &'static Cli {
        use clap::Parser;
        Box::leak(Box::new(Cli::parse_from(args)))
    }

    fn site(content: &str) -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("server-data/resources")).unwrap();
        let path = temp.path().join("deploy.toml");
        fs::write(&path, content).unwrap();
        (temp, path)
    }

    fn load_from(path: &Path, cli: &'static Cli) -> Result<BridgeConfig> {
        let mut config = BridgeConfig::from_path(path)?;
        config.config_path = path.to_path_buf();
        config.cli = Some(cli);
        config.finalize(cli);
        config.validate(&cli.command)?;
        Ok(config)
    }

    #[test]
    fn test_full_config_parses() {
        let config = test_parse_config(FULL);
        assert_eq!(config.webhook.secret().as_deref(), Some("s3cret"));
        assert_eq!(config.server.auto_start.len(), 2);
    }

    #[test]
    fn test_unknown_fields_collected() {
        let (_, ignored) =
            BridgeConfig::parse_with_ignored("[serve]\nport = 1\nwatch = true\n[extra]\na = 1")
                .unwrap();
        assert_eq!(ignored, ["serve.watch", "extra"]);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(BridgeConfig::parse_with_ignored("[serve\nport = 1").is_err());
        assert!(BridgeConfig::parse_with_ignored("[serve]\nport = \"eighty\"").is_err());
    }

    #[test]
    fn test_paths_resolved_against_config_dir() {
        let (temp, path) = site(FULL);
        let cli = leak_cli(&["resdeploy", "serve"]);
        let config = load_from(&path, cli).unwrap();

        let root = crate::utils::path::normalize_path(temp.path());
        assert_eq!(config.root, root);
        assert_eq!(config.git.path, root.join("server-data"));
        assert_eq!(config.watch.root, root.join("server-data/resources"));
    }

    #[test]
    fn test_cli_overrides_serve_options() {
        let (_temp, path) = site(FULL);
        let cli = leak_cli(&["resdeploy", "serve", "-p", "9999", "--watch", "false"]);
        let config = load_from(&path, cli).unwrap();

        assert_eq!(config.serve.port, 9999);
        assert!(!config.watch.enable);
    }

    #[test]
    fn test_serve_reports_all_errors() {
        let (_temp, path) = site("[watch]\nroot = \"missing\"");
        let cli = leak_cli(&["resdeploy", "serve"]);
        let err = load_from(&path, cli).unwrap_err();

        let Some(ConfigError::Diagnostics(diag)) = err.downcast_ref::<ConfigError>() else {
            panic!("expected diagnostics, got {err:#}");
        };
        let fields: Vec<_> = diag.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["webhook.secret", "rcon.password", "watch.root"]);
    }

    #[test]
    fn test_watch_root_ignored_when_disabled() {
        let content = FULL.replace("root = \"server-data/resources\"", "root = \"missing\"");
        let (_temp, path) = site(&content);
        let cli = leak_cli(&["resdeploy", "serve", "--watch=false"]);
        assert!(load_from(&path, cli).is_ok());
    }

    #[test]
    fn test_resolve_only_checks_watch() {
        let (_temp, path) = site("[watch]\nroot = \"server-data/resources\"");
        let cli = leak_cli(&["resdeploy", "resolve", "x"]);
        assert!(load_from(&path, cli).is_ok());
    }
}
