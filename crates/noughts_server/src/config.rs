//! Server configuration.

use crate::error::ConfigError;
use derive_getters::Getters;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, instrument};

/// How clients end up in a session.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Deserialize,
    clap::ValueEnum,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MatchMode {
    /// Clients send `CREATE GAME <id>` / `JOIN GAME <id>`.
    #[default]
    Named,
    /// Clients are paired on connect and told `PLAYER 1` / `PLAYER 2`.
    Auto,
}

/// Configuration for the game server.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    host: String,

    /// Port to listen on; 0 picks a free one.
    #[serde(default = "default_port")]
    port: u16,

    /// Path of the WebSocket endpoint.
    #[serde(default = "default_path")]
    path: String,

    /// Matchmaking mode.
    #[serde(default)]
    mode: MatchMode,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    52301
}

fn default_path() -> String {
    "/ws".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            path: default_path(),
            mode: MatchMode::default(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file. Missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;

        info!(port = config.port, mode = %config.mode, "Config loaded successfully");
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.path.starts_with('/') {
            return Err(ConfigError::new(format!(
                "Endpoint path must start with '/': {}",
                self.path
            )));
        }
        Ok(())
    }

    /// Sets the host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the endpoint path.
    pub fn with_path(mut self, path: impl Into<String>) -> Result<Self, ConfigError> {
        self.path = path.into();
        self.validate()?;
        Ok(self)
    }

    /// Sets the matchmaking mode.
    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// `host:port` for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
