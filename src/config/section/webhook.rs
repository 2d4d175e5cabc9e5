//! `[webhook]` section configuration.
//!
//! ```toml
//! [webhook]
//! secret = "..."              # shared secret set on the git host
//! # or
//! secret_env = "GITHUB_SECRET"
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

const SECRET: FieldPath = FieldPath::new("webhook.secret");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Inline shared secret.
    pub secret: Option<String>,

    /// Environment variable holding the secret.
    pub secret_env: Option<String>,
}

impl WebhookConfig {
    /// Effective secret: inline value first, then the environment.
    pub fn secret(&self) -> Option<String> {
        super::secret_from(self.secret.as_deref(), self.secret_env.as_deref())
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.secret().is_some() {
            return;
        }
        match &self.secret_env {
            Some(name) => diag.error_with_hint(
                SECRET,
                format!("environment variable `{name}` is unset or empty"),
                "export it before starting, or set `secret` directly",
            ),
            None => diag.error_with_hint(
                SECRET,
                "no webhook secret configured",
                "set `secret` or `secret_env` to the secret configured on the git host",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_inline_secret() {
        let config = test_parse_config("[webhook]\nsecret = \"hunter2\"");
        assert_eq!(config.webhook.secret().as_deref(), Some("hunter2"));
    }

    #[test]
    fn test_missing_secret_is_error() {
        let config = test_parse_config("");
        let mut diag = ConfigDiagnostics::new();
        config.webhook.validate(&mut diag);
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field, SECRET);
    }

    #[test]
    fn test_unset_env_is_error() {
        let config =
            test_parse_config("[webhook]\nsecret_env = \"RESDEPLOY_TEST_UNSET_VARIABLE\"");
        let mut diag = ConfigDiagnostics::new();
        config.webhook.validate(&mut diag);
        assert!(diag.errors()[0].message.contains("RESDEPLOY_TEST_UNSET_VARIABLE"));
    }
}
