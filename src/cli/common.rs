//! Common utilities shared across CLI commands.

use anyhow::{Context, Result};

use crate::config::RconConfig;
use crate::rcon::UdpRcon;

/// Open the remote console described by `[rcon]`.
pub fn connect_rcon(rcon: &RconConfig) -> Result<UdpRcon> {
    let password = rcon
        .password()
        .context("no rcon password configured")?;
    let client = UdpRcon::connect(&rcon.host, rcon.port, password)?;
    crate::debug!("rcon"; "{}:{} -> {}", rcon.host, rcon.port, client.addr());
    Ok(client)
}
