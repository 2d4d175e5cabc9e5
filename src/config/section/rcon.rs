//! `[rcon]` section configuration.
//!
//! ```toml
//! [rcon]
//! host = "127.0.0.1"
//! port = 30120
//! password = "..."            # or password_env = "RCON_PASSWORD"
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

const HOST: FieldPath = FieldPath::new("rcon.host");
const PASSWORD: FieldPath = FieldPath::new("rcon.password");

/// Game server remote console settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RconConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    /// Environment variable holding the password.
    pub password_env: Option<String>,
}

impl Default for RconConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 30120,
            password: None,
            password_env: None,
        }
    }
}

impl RconConfig {
    /// Effective password: inline value first, then the environment.
    pub fn password(&self) -> Option<String> {
        super::secret_from(self.password.as_deref(), self.password_env.as_deref())
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.host.trim().is_empty() {
            diag.error(HOST, "host must not be empty");
        }
        if self.password().is_none() {
            diag.error_with_hint(
                PASSWORD,
                "no rcon password configured",
                "set `password` or `password_env` to the server's rcon_password",
            );
        }
    }
}
