//! Auto-start resource list.
//!
//! The resources a full refresh restarts, in order. Entries come from the
//! `[server] auto_start` list and, when `[server] config_file` is set, from the
//! `AutoStartResources` key of the server's YAML config. Inline entries go
//! first; YAML entries already listed inline are skipped.
//!
//! Read once at startup and never changed afterwards.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rustc_hash::FxHashSet;
use serde::Deserialize;

use super::ResourceId;

/// Ordered, duplicate-free list of resources to restart on refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoStartList(Vec<ResourceId>);

/// The part of the server YAML document we care about.
#[derive(Debug, Deserialize)]
struct ServerDocument {
    #[serde(rename = "AutoStartResources", default)]
    auto_start: Vec<ResourceId>,
}

impl AutoStartList {
    pub fn new(ids: impl IntoIterator<Item = ResourceId>) -> Self {
        let mut seen = FxHashSet::default();
        Self(ids.into_iter().filter(|id| seen.insert(id.clone())).collect())
    }

    /// Build the list from inline entries plus an optional server YAML file.
    pub fn load(inline: &[ResourceId], server_config: Option<&Path>) -> Result<Self> {
        let mut ids = inline.to_vec();

        if let Some(path) = server_config {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read server config {}", path.display()))?;
            let from_file = Self::parse_yaml(&content)
                .with_context(|| format!("Invalid server config {}", path.display()))?;
            crate::debug!("config"; "{} auto-start entries from {}", from_file.len(), path.display());
            ids.extend(from_file);
        }

        Ok(Self::new(ids))
    }

    /// Read `AutoStartResources` from a server YAML document.
    fn parse_yaml(content: &str) -> Result<Vec<ResourceId>> {
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let doc: ServerDocument = serde_yaml_ng::from_str(content)?;
        Ok(doc.auto_start)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceId> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
