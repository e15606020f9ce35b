//! Command-line interface for noughts_server.

use crate::config::{MatchMode, ServerConfig};
use crate::error::ConfigError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, instrument};

/// Noughts - two-player tic-tac-toe over WebSocket
#[derive(Parser, Debug)]
#[command(name = "noughts_server")]
#[command(about = "Turn-based tic-tac-toe server for WebSocket clients", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the WebSocket game server
    Serve(ServeArgs),
}

/// Options for `serve`. Flags override values from the config file.
#[derive(clap::Args, Debug, Default)]
pub struct ServeArgs {
    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path of the WebSocket endpoint
    #[arg(long)]
    pub path: Option<String>,

    /// How players are paired
    #[arg(short, long, value_enum)]
    pub mode: Option<MatchMode>,
}

impl ServeArgs {
    /// Resolves the effective configuration: file (or defaults), then flags.
    #[instrument(skip(self))]
    pub fn resolve(self) -> Result<ServerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)?,
            None => {
                info!("No config file given, using defaults");
                ServerConfig::default()
            }
        };

        if let Some(host) = self.host {
            config = config.with_host(host);
        }
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(path) = self.path {
            config = config.with_path(path)?;
        }
        if let Some(mode) = self.mode {
            config = config.with_mode(mode);
        }
        Ok(config)
    }
}
