//! `[serve]` section configuration.
//!
//! HTTP listener that receives webhook deliveries.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "0.0.0.0"       # Network interface (0.0.0.0 = all interfaces)
//! port = 8080                 # HTTP port number
//! ```
//!
//! The listener must be reachable by the git host, so it binds all
//! interfaces by default.

use std::net::{IpAddr, Ipv4Addr};

use serde::{Deserialize, Serialize};

/// Webhook server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
        }
    }
}
