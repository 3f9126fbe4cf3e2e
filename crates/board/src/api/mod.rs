//! HTTP + WebSocket API.

mod routes;
mod ws;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{TokenScheme, UserStore};
use crate::broadcast::BroadcastManager;

/// Shared app state. Built once in `main` and cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub board: Arc<BroadcastManager>,
    pub users: Arc<UserStore>,
    pub tokens: Arc<dyn TokenScheme>,
    pub config: Arc<crate::config::Config>,
}

impl AppState {
    /// Composition root: seed users, pick the token scheme, create the board.
    pub fn from_config(config: crate::config::Config) -> anyhow::Result<Self> {
        let users = Arc::new(UserStore::from_seeds(&config.users, config.bcrypt_cost)?);
        if users.is_empty() {
            tracing::warn!("no users configured, authenticated endpoints will reject everyone");
        }
        let tokens = crate::auth::token_scheme(&config, users.clone());
        Ok(Self {
            board: Arc::new(BroadcastManager::new(config.outbound_queue_capacity)),
            users,
            tokens,
            config: Arc::new(config),
        })
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(health))
        .nest("/api", routes::api_routes())
        .route("/ws/{client_id}", get(ws::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
