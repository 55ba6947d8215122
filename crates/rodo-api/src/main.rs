//! rodo-api server entry point.
//!
//! Configuration comes from the environment (see `AppConfig::from_env`).
//! Logs go to stdout as text, or as JSON lines when `RODO_LOG_FORMAT=json`.
//! `RUST_LOG` overrides the default `info` filter.

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use rodo_api::state::{AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(
        auth = config.auth_token.is_some(),
        metrics = config.metrics_enabled,
        "starting rodo-api"
    );

    let app = rodo_api::app(AppState::with_config(config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("rodo-api listening on {addr}");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("rodo-api stopped");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("RODO_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
