use anyhow::Result;
use apcupsd_exporter::{
    config::AppConfig,
    metrics_server, observability,
    server::{self, AppState},
};
use std::{net::SocketAddr, sync::Arc};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;

    let metrics = metrics_server::install_recorder()?;

    let addr: SocketAddr = cfg
        .server
        .bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid server.bind_addr: {e}"))?;

    let client = cfg.nis.client();
    tracing::info!(
        connect_timeout_ms = cfg.nis.connect_timeout_ms,
        read_timeout_ms = cfg.nis.read_timeout_ms,
        decode_all_lines = cfg.nis.decode_all_lines,
        "NIS client configured"
    );

    let app = server::router(AppState {
        source: Arc::new(client),
        metrics,
    });

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "metric listener started");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
