//! Same-origin proxy for the Selly-AI chat page.
//!
//! Exposes `POST /api/start-session` and `POST /api/message`, forwarding each
//! request body to the assistant backend and relaying its answer, and serves
//! the built web UI when a directory is configured.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod server;
pub mod upstream;

pub use cli::Cli;
pub use config::ProxyConfig;
pub use error::ProxyError;
pub use routes::{create_router, AppState};
pub use server::ProxyServer;
pub use upstream::UpstreamClient;
