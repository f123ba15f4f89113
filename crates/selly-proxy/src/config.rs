use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::cli::Cli;

/// Resolved proxy configuration
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub bind_addr: SocketAddr,
    /// Backend base URL without trailing slash
    pub api_url: String,
    pub web_dir: Option<PathBuf>,
    pub permissive_cors: bool,
}

impl ProxyConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let bind_addr: SocketAddr = format!("{}:{}", cli.bind, cli.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", cli.bind, cli.port))?;

        let api_url = normalize_base_url(&cli.api_url);
        reqwest::Url::parse(&api_url)
            .with_context(|| format!("Invalid backend URL: {}", cli.api_url))?;

        Ok(Self {
            bind_addr,
            api_url,
            web_dir: cli.web_dir.clone(),
            permissive_cors: cli.permissive_cors,
        })
    }
}

/// Trim whitespace and trailing slashes so endpoint paths can be appended
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
