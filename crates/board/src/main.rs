//! Sales board server — HTTP + WebSocket.
//!
//! Optional env: HOST, PORT, AUTH_MODE, JWT_SECRET, JWT_TTL_SECS, BOARD_USERS,
//! OUTBOUND_QUEUE_CAPACITY, WS_PING_INTERVAL_SECS

use std::net::SocketAddr;

use board::{api, config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::Config::from_env().map_err(|e| anyhow::anyhow!("config: {}", e))?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid bind address: {}", e))?;

    let state = api::AppState::from_config(config)?;
    tracing::info!(
        users = state.users.len(),
        auth_mode = ?state.config.auth_mode,
        "board ready"
    );
    let app = api::router(state);

    tracing::info!("Board listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await?;

    Ok(())
}
