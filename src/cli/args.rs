//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Deploy bridge between a git repository and a game server's resources
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: deploy.toml)
    #[arg(short = 'C', long, global = true, default_value = "deploy.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the webhook server and the resource watcher
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Restart resources when their files change
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        watch: Option<bool>,
    },

    /// Send `refresh` and restart the auto-start resources
    #[command(visible_alias = "f")]
    Refresh,

    /// Restart the given resources
    #[command(visible_alias = "r")]
    Restart {
        /// Resource names
        #[arg(required = true, value_name = "ID")]
        resources: Vec<String>,
    },

    /// Print the resource that owns each path
    Resolve {
        /// Files or directories under the watch root
        #[arg(required = true, value_name = "PATH", value_hint = clap::ValueHint::AnyPath)]
        paths: Vec<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_args() {
        let cli = Cli::parse_from(["resdeploy", "serve", "-p", "9000", "--watch"]);
        match cli.command {
            Commands::Serve {
                interface,
                port,
                watch,
            } => {
                assert_eq!(interface, None);
                assert_eq!(port, Some(9000));
                assert_eq!(watch, Some(true));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.config, PathBuf::from("deploy.toml"));
    }

    #[test]
    fn test_watch_explicit_false() {
        let cli = Cli::parse_from(["resdeploy", "serve", "--watch", "false"]);
        assert!(matches!(
            cli.command,
            Commands::Serve {
                watch: Some(false),
                ..
            }
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["resdeploy", "restart", "chat", "-v", "-C", "other.toml"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("other.toml"));
        assert!(matches!(cli.command, Commands::Restart { ref resources } if resources == &["chat"]));
    }

    #[test]
    fn test_version_and_verbose_flags() {
        let err = Cli::try_parse_from(["resdeploy", "-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);

        let cli = Cli::parse_from(["resdeploy", "-v", "refresh"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_restart_requires_ids() {
        assert!(Cli::try_parse_from(["resdeploy", "restart"]).is_err());
    }
}
