//! Wallet Sentry API Server
//!
//! REST API for multi-chain address analysis
//!
//! Usage:
//!   cargo run --bin sentry_api
//!
//! Environment:
//!   SENTRY_PORT - Server port (default: 8080, PORT takes precedence)
//!   SENTRY_HOST - Server host (default: 0.0.0.0)
//!   RUST_LOG    - Log level (default: info)

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use wallet_sentry::api::{create_router, spawn_cleanup_task, AppState};
use wallet_sentry::{AddressAnalyzer, SentryConfig, TelemetryCollector};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = SentryConfig::from_env();
    let analyzer = Arc::new(AddressAnalyzer::from_config(&config)?);
    let chains = analyzer.registry().supported_chains();

    let telemetry = Arc::new(TelemetryCollector::new());
    let telemetry_for_shutdown = telemetry.clone();

    let state = Arc::new(AppState::new(analyzer, telemetry));

    // Start background cleanup task for rate limiter
    let cleanup = spawn_cleanup_task(state.rate_limiter.clone());
    info!("🧹 Background cleanup task started");

    let app = create_router(state);

    // PORT is set by most hosting platforms, SENTRY_PORT for local dev
    let host = std::env::var("SENTRY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .or_else(|_| std::env::var("SENTRY_PORT"))
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("🚀 Wallet Sentry API starting on http://{}", addr);
    info!(
        "⛓️  Chains: {}",
        chains.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(", ")
    );
    info!("Endpoints:");
    info!("  GET  /v1/analyze?address=..&chain=..  - Analyze an address");
    info!("  POST /v1/analyze                      - Analyze an address (JSON body)");
    info!("  GET  /v1/chains                       - Supported chains");
    info!("  GET  /v1/stats                        - Request statistics");
    info!("  GET  /v1/health                       - Health check");
    info!("Press Ctrl+C for graceful shutdown");

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("⚠️ Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    // Peer address feeds the rate limiter when no proxy header is present
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("🛑 Shutdown signal received, cleaning up...");
    cleanup.abort();

    let stats = telemetry_for_shutdown.get_stats();
    info!("📊 {}", stats.summary());
    info!("👋 Wallet Sentry API shutdown complete");

    Ok(())
}
