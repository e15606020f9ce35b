//! Noughts server - unified CLI

use anyhow::Result;
use clap::Parser;
use noughts_server::cli::{Cli, Command};
use noughts_server::GameServer;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing();

    match cli.command {
        Command::Serve(args) => {
            let config = args.resolve()?;
            info!(addr = %config.bind_addr(), mode = %config.mode(), "Starting noughts server");
            GameServer::new(config).run().await
        }
    }
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,noughts_server=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
