//! Client configuration
//!
//! Loaded from defaults, a YAML document or the environment:
//!
//! ```yaml
//! endpoint: http://localhost:7474
//! api_root: /db/data/
//! timeout_secs: 30
//! id_key: id
//! ```

use crate::error::{SeraphError, SeraphResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the store endpoint
pub const ENV_URL: &str = "SERAPH_URL";
/// Environment variable holding the request timeout in seconds
pub const ENV_TIMEOUT: &str = "SERAPH_TIMEOUT_SECS";

/// Connection settings for a graph store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Scheme, host and port of the store, e.g. `http://localhost:7474`
    pub endpoint: String,
    /// Path prefix of the REST API
    pub api_root: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Property key that carries the node id in flat object form
    pub id_key: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:7474".to_string(),
            api_root: "/db/data/".to_string(),
            timeout_secs: 30,
            id_key: "id".to_string(),
        }
    }
}

impl ClientConfig {
    /// Default settings pointed at another endpoint
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn from_yaml_str(yaml: &str) -> SeraphResult<Self> {
        let mut config: ClientConfig =
            serde_yaml::from_str(yaml).map_err(|e| SeraphError::config(e.to_string()))?;
        config.endpoint = config.endpoint.trim_end_matches('/').to_string();
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> SeraphResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SeraphError::config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&text)
    }

    /// Defaults overridden by `SERAPH_URL` and `SERAPH_TIMEOUT_SECS`
    pub fn from_env() -> SeraphResult<Self> {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(ENV_URL) {
            config.endpoint = url.trim_end_matches('/').to_string();
        }
        if let Ok(timeout) = std::env::var(ENV_TIMEOUT) {
            config.timeout_secs = timeout
                .parse()
                .map_err(|_| SeraphError::config(format!("{} must be an integer", ENV_TIMEOUT)))?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SeraphResult<()> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(SeraphError::config(format!(
                "endpoint must be an http(s) URL, got {:?}",
                self.endpoint
            )));
        }
        if self.timeout_secs == 0 {
            return Err(SeraphError::config("timeout_secs must be greater than zero"));
        }
        if self.id_key.is_empty() {
            return Err(SeraphError::config("id_key must not be empty"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Absolute URL of an API path, e.g. `node/12` -> `http://host/db/data/node/12`
    pub fn api_url(&self, path: &str) -> String {
        let root = format!("/{}/", self.api_root.trim_matches('/'));
        let root = if root == "//" { "/".to_string() } else { root };
        format!("{}{}{}", self.endpoint, root, path.trim_start_matches('/'))
    }

    /// Absolute self-reference of a stored entity
    pub fn resource_uri(&self, kind: &str, id: u64) -> String {
        self.api_url(&format!("{}/{}", kind, id))
    }
}
