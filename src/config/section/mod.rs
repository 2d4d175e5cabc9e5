//! Configuration section definitions.
//!
//! Each module corresponds to a section in `deploy.toml`:
//!
//! | Module    | TOML Section | Purpose                                  |
//! |-----------|--------------|------------------------------------------|
//! | `serve`   | `[serve]`    | HTTP listener for the webhook            |
//! | `webhook` | `[webhook]`  | Shared secret for signature checks       |
//! | `git`     | `[git]`      | Working tree to pull                     |
//! | `rcon`    | `[rcon]`     | Game server remote console               |
//! | `watch`   | `[watch]`    | Resource watcher and restart window      |
//! | `server`  | `[server]`   | Auto-start resources for a full refresh  |

mod git;
mod rcon;
mod serve;
mod server;
mod watch;
mod webhook;

pub use git::GitConfig;
pub use rcon::RconConfig;
pub use serve::ServeConfig;
pub use server::ServerConfig;
pub use watch::WatchConfig;
pub use webhook::WebhookConfig;

/// Pick an inline secret, or read it from the named environment variable.
///
/// Empty values count as unset.
fn secret_from(inline: Option<&str>, env: Option<&str>) -> Option<String> {
    if let Some(value) = inline.filter(|v| !v.is_empty()) {
        return Some(value.to_string());
    }
    env.and_then(|name| std::env::var(name).ok())
        .filter(|v| !v.is_empty())
}
