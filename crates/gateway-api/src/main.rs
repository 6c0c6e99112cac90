//! # gateway-api: Binary Entry Point
//!
//! Starts the Axum HTTP server for the gateway.
//! Binds to a configurable port (default 8080).

use anyhow::Context;
use clap::{Parser, ValueEnum};
use gateway_api::state::{AppConfig, AppState};
use gateway_client::{GatewayClient, GatewayClientConfig};
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Json,
    Pretty,
}

/// API gateway for the user platform services.
#[derive(Debug, Parser)]
#[command(name = "gateway-api", version, about)]
struct Cli {
    /// Port to bind the HTTP server to.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Json)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    // Build configuration from environment.
    let client_config = GatewayClientConfig::from_env().map_err(|e| {
        tracing::error!("Downstream configuration invalid: {e}");
        e
    })?;
    tracing::info!(
        user_service = %client_config.user_service_url,
        auth_service = %client_config.auth_service_url,
        request_timeout_ms = client_config.request_timeout.as_millis() as u64,
        "downstream services configured"
    );
    let clients = GatewayClient::new(client_config).context("failed to build downstream clients")?;
    let config = AppConfig::from_env();

    let app = gateway_api::app(AppState::new(config, clients));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], cli.port));
    tracing::info!("Gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Gateway stopped");
    Ok(())
}

/// Initialize structured tracing. `RUST_LOG` overrides the `info` default.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
