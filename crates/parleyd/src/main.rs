//! parleyd entry point.

use anyhow::{Context, Result};
use tokio::net::TcpListener;

use parley_core::config::ParleyConfig;
use parley_core::ClientCounter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load config
    if let Err(e) = ParleyConfig::write_default_if_missing() {
        tracing::warn!(error = %e, "failed to write default config");
    }
    let mut config = ParleyConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        ParleyConfig::default()
    });

    // A lone CLI argument overrides the configured port.
    if let Some(arg) = std::env::args().nth(1) {
        config.network.port = arg
            .parse()
            .with_context(|| format!("invalid port argument: {arg}"))?;
    }

    // Bind failure is the only error fatal to the whole process.
    let addr = format!("0.0.0.0:{}", config.network.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, inactivity_secs = config.session.inactivity_secs, "server listening");

    let counter = ClientCounter::new();
    let accept_task = tokio::spawn(parleyd::serve(listener, counter, config.session));

    // No drain protocol: exiting aborts every live session.
    tokio::select! {
        _ = tokio::signal::ctrl_c() => tracing::info!("shutdown signal received"),
        r = accept_task             => tracing::error!("accept loop exited: {:?}", r),
    }

    Ok(())
}
