use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for selly-proxy
#[derive(Parser, Debug, Clone)]
#[command(name = "selly-proxy")]
#[command(about = "Selly-AI chat proxy - relays the chat page's API calls to the assistant backend")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Base URL of the assistant backend (e.g., http://localhost:8000)
    #[arg(long, env = "SELLY_API_URL", value_name = "URL")]
    pub api_url: String,

    /// Address to bind the proxy to
    #[arg(long, default_value = "127.0.0.1", value_name = "ADDR")]
    pub bind: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 3000)]
    pub port: u16,

    /// Directory with the built web UI (index.html and pkg/), served at /
    #[arg(long, value_name = "PATH")]
    pub web_dir: Option<PathBuf>,

    /// Accept cross-origin requests from anywhere (development only)
    #[arg(long)]
    pub permissive_cors: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info", value_name = "FILTER")]
    pub log_level: String,
}
