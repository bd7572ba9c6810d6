// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use siws_vault::{api::start_server, config::AppConfig, version};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sign-In-With-Solana verification service
#[derive(Parser, Debug)]
#[command(name = "siws-vault", version, about)]
struct Args {
    /// TOML config file; environment variables override its values
    #[arg(long, env = "SIWS_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    tracing::info!("🚀 Starting {}", version::get_version_string());
    tracing::info!("📦 BUILD VERSION: {}", version::VERSION);

    let config = AppConfig::load(args.config.as_deref())?;
    tracing::info!(
        "🔐 Sign-in domain: {} (chain: {})",
        config.siws.domain,
        config.siws.chain_id.as_deref().unwrap_or("any")
    );

    start_server(config).await
}
