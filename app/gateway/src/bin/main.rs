//! Agentgate binary entry point.
//!
//! Resolves configuration, builds the gateway, and serves until ctrl-c.

use agentgate_gateway::{GatewayConfig, serve};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Authenticated HTTP gateway in front of a pluggable executor.
#[derive(Debug, Parser)]
#[command(name = "agentgate", version)]
struct Cli {
    /// TOML configuration file. Defaults and `AGENT_*` variables apply
    /// without one.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Address to bind, overriding `server.host` and `server.port`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing from RUST_LOG (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = GatewayConfig::resolve(cli.config.as_deref())?;
    let bind = cli.bind.unwrap_or_else(|| config.bind_address());

    let handle = serve(&config, &bind).await?;
    tokio::signal::ctrl_c()
        .await
        .context("failed to install ctrl-c handler")?;
    handle.shutdown().await
}
