//! Optional TOML configuration.
//!
//! Every setting has a default and can be overridden on the command line, so
//! the config file is never required. Precedence is CLI flag, then config
//! file, then default.
//!
//! ```toml
//! [storage]
//! path = "contacts.json"
//!
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_FILE: &str = "contacts.json";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

fn default_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_FILE)
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Config {
    /// Apply command-line overrides on top of the loaded values.
    pub fn with_overrides(mut self, file: Option<PathBuf>, port: Option<u16>) -> Self {
        if let Some(file) = file {
            self.storage.path = file;
        }
        if let Some(port) = port {
            self.server.port = port;
        }
        self
    }

    /// The data file as an absolute path, resolved against the current
    /// directory when relative.
    pub fn resolve_data_file(&self) -> Result<PathBuf> {
        let path = &self.storage.path;
        if path.is_absolute() {
            return Ok(path.clone());
        }
        let cwd = std::env::current_dir().context("Failed to determine current directory")?;
        Ok(cwd.join(path))
    }

    /// `host:port` string for the HTTP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage.path.as_os_str().is_empty() {
            anyhow::bail!("storage.path must not be empty");
        }
        if self.server.port == 0 {
            anyhow::bail!("server.port must be > 0");
        }
        if self.server.host.trim().is_empty() {
            anyhow::bail!("server.host must not be empty");
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    config.validate()?;

    Ok(config)
}
