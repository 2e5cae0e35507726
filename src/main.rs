//! Restaurant Menu API - serve a restaurant website's menu as JSON
//!
//! Parses configuration, sets up logging and runs the HTTP server until
//! Ctrl+C or SIGTERM.

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use menu_proxy::cli::{Cli, ServerConfig};

const DEFAULT_LOG_FILTER: &str = "menu_proxy=info,tower_http=info";

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = ServerConfig::from_cli(&cli)?;
    info!("Starting menu-proxy v{}", env!("CARGO_PKG_VERSION"));

    menu_proxy::api::serve(config).await
}
