//! `[server]` section configuration.
//!
//! Resources restarted after every full refresh.
//!
//! ```toml
//! [server]
//! auto_start = ["chat", "spawnmanager"]
//! config_file = "server-data/citmp-server.yml"  # reads AutoStartResources
//! ```

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::resource::ResourceId;
use crate::resource::autostart::AutoStartList;

const CONFIG_FILE: FieldPath = FieldPath::new("server.config_file");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Resources listed inline.
    pub auto_start: Vec<ResourceId>,

    /// Server YAML config with an `AutoStartResources` list.
    pub config_file: Option<PathBuf>,
}

impl ServerConfig {
    /// Inline entries followed by the YAML ones.
    pub fn auto_start_list(&self) -> Result<AutoStartList> {
        AutoStartList::load(&self.auto_start, self.config_file.as_deref())
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Some(path) = &self.config_file
            && !path.is_file()
        {
            diag.error(
                CONFIG_FILE,
                format!("server config not found: {}", path.display()),
            );
        }
    }
}
