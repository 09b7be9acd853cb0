#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

mod config;
mod server;

use fin::FinancialIntelligence;
use rmcp::serve_server;
use rmcp::transport::io::stdio;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::server::FinMcp;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = config::from_args()?;
    let service = FinMcp::new(FinancialIntelligence::from_config(&config)?);
    info!(version = env!("CARGO_PKG_VERSION"), "Financial intelligence MCP server started (stdio)");

    let (stdin, stdout) = stdio();
    let running = serve_server(service, (stdin, stdout)).await?;
    let _ = running.waiting().await?;
    Ok(())
}
