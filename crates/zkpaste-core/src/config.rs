use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{PasteError, PasteResult};
use crate::types::{PasteOptions, Protocol, ServerEndpoint};

/// Top-level client configuration (loaded from zkpaste.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server: ServerConfig,
    pub paste: PasteOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Paste server host name
    pub host: String,
    /// "http" or "https" (default: https)
    pub protocol: Protocol,
    /// TCP port (default: 80 for http, 443 for https)
    pub port: Option<u16>,
    /// Path the paste application is served from (default: /)
    pub path: String,
    /// Upper bound on the whole HTTP round trip, in seconds
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "colle.delire.party".into(),
            protocol: Protocol::Https,
            port: None,
            path: "/".into(),
            timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Validate and freeze the connection settings.
    pub fn endpoint(&self) -> PasteResult<ServerEndpoint> {
        if self.timeout_secs == 0 {
            return Err(PasteError::Config("timeout_secs must be at least 1".into()));
        }
        let port = self.port.unwrap_or_else(|| self.protocol.default_port());
        ServerEndpoint::new(self.protocol, self.host.clone(), port, self.path.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ClientConfig {
    /// Parse a TOML document; missing keys fall back to defaults.
    pub fn from_toml(content: &str) -> PasteResult<Self> {
        toml::from_str(content).map_err(|e| PasteError::Config(e.to_string()))
    }

    /// Load from `path`, or return defaults when the file does not exist.
    pub fn load(path: &Path) -> PasteResult<Self> {
        if !path.exists() {
            tracing::debug!(config = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| PasteError::Config(format!("reading {}: {e}", path.display())))?;
        Self::from_toml(&content)
            .map_err(|e| PasteError::Config(format!("parsing {}: {e}", path.display())))
    }
}
