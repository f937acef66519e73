//! Configuration for ROI Bridge
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats, stored by default in the platform config directory.
//!
//! Configuration is organized into two sections:
//! - Servers (named endpoints with optional default user and timeout)
//! - Transfer options (update vs. copy on upload, default collection name)

use roibridge_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Default port of the image server
pub const DEFAULT_PORT: u16 = 4064;

/// One remote image server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Name used to pick this server
    pub name: String,
    /// Hostname or address
    pub host: String,
    pub port: u16,
    /// User offered when prompting for credentials
    pub username: Option<String>,
    /// Connect timeout handed to the remote client with the endpoint, in milliseconds
    pub timeout_ms: u64,
}

impl ServerSettings {
    pub fn new(name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            ..Self::default()
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            name: "local".to_string(),
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            username: None,
            timeout_ms: 30_000,
        }
    }
}

/// Options applied to uploads and downloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferSettings {
    /// Update shapes the bridge already knows instead of creating copies
    pub update_existing: bool,
    /// Name given to ROIs created for unnamed collections
    pub default_collection_name: Option<String>,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            update_existing: true,
            default_collection_name: None,
        }
    }
}

/// Complete bridge configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Known servers
    pub servers: Vec<ServerSettings>,
    /// Transfer options
    pub transfer: TransferSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform location of the config file (`<config dir>/roibridge/config.toml`)
    pub fn default_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| Error::other("No platform config directory available"))?;
        path.push("roibridge");
        path.push("config.toml");
        Ok(path)
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::other(format!("Failed to read config file: {}", e)))?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .map_err(|e| Error::other(format!("Invalid JSON config: {}", e)))?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)
                .map_err(|e| Error::other(format!("Invalid TOML config: {}", e)))?
        } else {
            return Err(Error::other("Config file must be .json or .toml"));
        };

        config.validate()?;
        tracing::debug!(path = %path.display(), servers = config.servers.len(), "Loaded config");
        Ok(config)
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)
                .map_err(|e| Error::other(format!("Failed to serialize config: {}", e)))?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::to_string_pretty(self)
                .map_err(|e| Error::other(format!("Failed to serialize config: {}", e)))?
        } else {
            return Err(Error::other("Config file must be .json or .toml"));
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| Error::other(format!("Failed to write config file: {}", e)))?;

        tracing::debug!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for server in &self.servers {
            if server.host.trim().is_empty() {
                return Err(Error::other(format!(
                    "Server '{}' has an empty host",
                    server.name
                )));
            }
            if server.port == 0 {
                return Err(Error::other(format!("Server '{}' port must be > 0", server.name)));
            }
            if server.timeout_ms == 0 {
                return Err(Error::other(format!(
                    "Server '{}' timeout must be > 0",
                    server.name
                )));
            }
            if !names.insert(server.name.as_str()) {
                return Err(Error::other(format!("Duplicate server name '{}'", server.name)));
            }
        }

        Ok(())
    }

    /// Server entry by name
    pub fn server(&self, name: &str) -> Option<&ServerSettings> {
        self.servers.iter().find(|s| s.name == name)
    }

    /// Add a server, replacing any entry of the same name
    pub fn upsert_server(&mut self, server: ServerSettings) {
        match self.servers.iter_mut().find(|s| s.name == server.name) {
            Some(existing) => *existing = server,
            None => self.servers.push(server),
        }
    }
}
