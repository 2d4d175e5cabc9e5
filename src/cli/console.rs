//! One-shot commands: `refresh`, `restart` and `resolve`.

use std::path::PathBuf;

use anyhow::{Result, bail};

use super::common::connect_rcon;
use crate::actor::restart::dispatch;
use crate::config::BridgeConfig;
use crate::log;
use crate::resource::{ResourceId, ResourceResolver};
use crate::utils::path::normalize_path;
use crate::webhook::full_refresh;

/// Send `refresh` and restart the auto-start resources.
pub fn refresh(config: &BridgeConfig) -> Result<()> {
    let auto_start = config.server.auto_start_list()?;
    let sink = connect_rcon(&config.rcon)?;

    let expected = auto_start.len() + 1;
    let sent = full_refresh(&sink, &auto_start);
    log!("rcon"; "sent {}/{} command(s)", sent, expected);

    if sent < expected {
        bail!("{} command(s) could not be sent", expected - sent);
    }
    Ok(())
}

/// Restart the named resources, in the order given.
pub fn restart(config: &BridgeConfig, names: &[String]) -> Result<()> {
    let ids: Vec<ResourceId> = names.iter().map(ResourceId::new).collect();
    let sink = connect_rcon(&config.rcon)?;

    let sent = dispatch(&sink, &ids);
    log!("restart"; "{}/{} resource(s)", sent, ids.len());

    if sent < ids.len() {
        bail!("{} restart(s) could not be sent", ids.len() - sent);
    }
    Ok(())
}

/// Print the owning resource of each path, one per line.
pub fn resolve(config: &BridgeConfig, paths: &[PathBuf]) -> Result<()> {
    let resolver = config.watch.resolver();
    for (path, owner) in resolve_all(&resolver, paths) {
        match owner {
            Some(id) => println!("{}\t{}", path.display(), id),
            None => println!("{}\t-", path.display()),
        }
    }
    Ok(())
}

fn resolve_all<'a>(
    resolver: &ResourceResolver,
    paths: &'a [PathBuf],
) -> impl Iterator<Item = (&'a PathBuf, Option<ResourceId>)> {
    paths
        .iter()
        .map(move |path| (path, resolver.resolve(&normalize_path(path))))
}
