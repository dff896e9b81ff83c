//! shadowscan-server: API anomaly and shadow-endpoint detector.
//!
//! Endpoints:
//! - `POST /api/models` - ingest learned models
//! - `POST /api/detection/validate` - check one observed request
//! - `GET /health` - liveness, model count and cache stats

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use shadowscan_core::config::load_dotenv;
use shadowscan_core::Config;
use shadowscan_server::{build_router, AppState};

// ── CLI ─────────────────────────────────────────────────────────────

/// Learned-schema anomaly detector for API traffic.
#[derive(Parser, Debug)]
#[command(name = "shadowscan-server", version, about)]
struct Cli {
    /// Bind address, overrides HOST.
    #[arg(long)]
    host: Option<String>,

    /// Listen port, overrides PORT.
    #[arg(long, short)]
    port: Option<u16>,

    /// Config profile, overrides SHADOWSCAN_PROFILE.
    #[arg(long)]
    profile: Option<String>,
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    load_dotenv();
    let mut config = match &cli.profile {
        Some(profile) => Config::for_profile(profile),
        None => Config::from_env(),
    };
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.log_summary();

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_router(Arc::new(AppState::new(config)));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "shadowscan listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shadowscan stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
