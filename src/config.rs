//! Where the store lives and how long to wait for it.

use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::{ClientError, ClientResult};

pub const HOST_ENV: &str = "TABLEDB_HOST";
pub const PORT_ENV: &str = "TABLEDB_PORT";
pub const TIMEOUT_ENV: &str = "TABLEDB_TIMEOUT_SECS";

/// Connection settings for the store.
///
/// Resolved from defaults, then an optional TOML file, then the
/// `TABLEDB_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            scheme: "http".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8000,
            timeout_secs: 10,
        }
    }
}

impl ClientConfig {
    /// Loads the configuration, reading `path` when given and then applying
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> ClientResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => ClientConfig::default(),
        };
        config.apply_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ClientResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> ClientResult<Self> {
        toml::from_str(text).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Applies overrides looked up by `lookup`. Values that do not parse are
    /// skipped with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup(HOST_ENV) {
            let host = host.trim();
            if !host.is_empty() {
                self.host = host.to_string();
            }
        }

        if let Some(port) = lookup(PORT_ENV) {
            match port.trim().parse() {
                Ok(port) => self.port = port,
                Err(e) => warn!("ignoring {PORT_ENV}={port}: {e}"),
            }
        }

        if let Some(timeout) = lookup(TIMEOUT_ENV) {
            match timeout.trim().parse() {
                Ok(secs) => self.timeout_secs = secs,
                Err(e) => warn!("ignoring {TIMEOUT_ENV}={timeout}: {e}"),
            }
        }
    }

    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}
