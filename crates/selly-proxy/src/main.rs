use anyhow::Result;
use clap::Parser;

use selly::{logging, Cli, ProxyConfig, ProxyServer};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);

    let config = ProxyConfig::from_cli(&cli)?;
    log::info!("Forwarding to {}", config.api_url);

    ProxyServer::new(config).start().await
}
