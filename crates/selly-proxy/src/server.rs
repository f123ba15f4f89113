use anyhow::{Context, Result};
use axum::Router;
use colored::Colorize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::config::ProxyConfig;
use crate::routes::{self, AppState};
use crate::upstream::UpstreamClient;

/// Proxy server instance
pub struct ProxyServer {
    config: ProxyConfig,
    upstream: Arc<UpstreamClient>,
}

impl ProxyServer {
    pub fn new(config: ProxyConfig) -> Self {
        let upstream = Arc::new(UpstreamClient::new(&config.api_url));
        Self { config, upstream }
    }

    /// Build the full application router
    pub fn app(&self) -> Router {
        let state = AppState {
            upstream: self.upstream.clone(),
        };

        let mut app = routes::create_router(state);

        // Serve the chat page from the same origin as the API
        if let Some(web_dir) = &self.config.web_dir {
            if web_dir.exists() {
                log::info!("Serving web UI from {}", web_dir.display());
                app = app.fallback_service(ServeDir::new(web_dir));
            } else {
                log::warn!("Web directory {} does not exist, UI disabled", web_dir.display());
            }
        }

        if self.config.permissive_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app = app.layer(cors);
        }

        app
    }

    /// Bind the configured address and serve until shutdown
    pub async fn start(self) -> Result<()> {
        let listener = TcpListener::bind(&self.config.bind_addr)
            .await
            .with_context(|| format!("Failed to bind {}", self.config.bind_addr))?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let addr = listener.local_addr()?;

        println!("{} http://{}", "🌐 Selly-AI proxy listening on".bright_cyan(), addr);
        println!("   Backend: {}", self.upstream.base_url().bright_yellow());
        println!("   API endpoints: http://{}/api/start-session, http://{}/api/message", addr, addr);

        let app = self.app();
        axum::serve(listener, app).await.context("Proxy server stopped")?;

        Ok(())
    }
}
