//! Redmine MCP server binary.
//!
//! This binary runs the MCP server using stdio transport.

use clap::Parser;
use redmine_mcp::config::{Completeness, ServerConfig, API_KEY_ENV, BASE_URL_ENV};
use redmine_mcp::http::ReqwestBackend;
use redmine_mcp::RedmineMcpServer;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// MCP server exposing read-only Redmine queries over stdio.
#[derive(Parser, Debug)]
#[command(name = "redmine-mcp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Redmine base URL. `https://` is assumed when no scheme is given.
    #[arg(long, env = BASE_URL_ENV)]
    base_url: Option<String>,

    /// Redmine REST API key.
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the MCP stream.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("redmine_mcp=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    std::panic::set_hook(Box::new(|info| {
        tracing::error!(%info, "Unexpected panic");
    }));

    tracing::info!("Starting redmine-mcp server");

    let cli = Cli::parse();
    let config = ServerConfig::from_values(cli.base_url, cli.api_key);
    match config.completeness() {
        Completeness::Complete => {}
        Completeness::Empty => {
            tracing::warn!(
                "{BASE_URL_ENV} and {API_KEY_ENV} are not set; use the initialize tool to connect"
            );
        }
        Completeness::MissingBaseUrl => {
            tracing::warn!("{API_KEY_ENV} is set but {BASE_URL_ENV} is missing; ignoring both");
        }
        Completeness::MissingApiKey => {
            tracing::warn!("{BASE_URL_ENV} is set but {API_KEY_ENV} is missing; ignoring both");
        }
    }
    tracing::info!(
        base_url = config.base_url.as_deref().unwrap_or("<unset>"),
        api_key_set = config.api_key.is_some(),
        "Loaded configuration"
    );

    let backend = match ReqwestBackend::new() {
        Ok(backend) => Arc::new(backend),
        Err(e) => {
            tracing::error!(error = %e, "Failed to create HTTP client");
            return Err(e.into());
        }
    };

    let server = RedmineMcpServer::start(config, backend).await;
    if let Err(e) = server.run().await {
        tracing::error!(error = %e, "Server failed");
        return Err(e);
    }

    Ok(())
}
