//! API route handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};

use shared::{
    ReportSaleRequest, ReportSaleResponse, ServiceStatus, TokenRequest, TokenResponse,
    TOKEN_TYPE_BEARER,
};

use crate::api::AppState;
use crate::auth::{AuthError, UserIdentity};

/// Longest accepted out-of-band sale message, in bytes.
const MAX_MESSAGE_LEN: usize = 4096;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/token", post(auth_token))
        .route("/sales", post(sales_report).get(sales_history))
}

pub async fn root() -> Json<ServiceStatus> {
    Json(ServiceStatus {
        message: "Sales Board WebSocket Server is running!".to_string(),
    })
}

// --- Auth ---

async fn auth_token(
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, (StatusCode, String)> {
    let user = state
        .users
        .authenticate(&req.username, &req.password)
        .inspect_err(|_| tracing::warn!(username = %req.username, "login rejected"))?;
    let issued = state.tokens.issue(&user)?;
    Ok(Json(TokenResponse {
        access_token: issued.token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_at: issued.expires_at,
    }))
}

// --- Sales ---

/// Out-of-band ingress: authenticated sale report, same record/broadcast path as the socket.
///
/// The bearer is checked before the body, so an unauthenticated caller always gets 401.
async fn sales_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ReportSaleRequest>, JsonRejection>,
) -> Result<Json<ReportSaleResponse>, (StatusCode, String)> {
    let token = extract_bearer_from_headers(&headers)?;
    let user = verify_bearer(&token, &state)?;
    let Json(req) = body.map_err(|e| (e.status(), e.body_text()))?;
    if req.message.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "message is empty".to_string()));
    }
    if req.message.len() > MAX_MESSAGE_LEN {
        return Err((StatusCode::BAD_REQUEST, "message too long".to_string()));
    }
    let event = state.board.report_sale(&req.message);
    tracing::info!(username = %user.username, "sale reported over http");
    Ok(Json(ReportSaleResponse {
        event: event.to_string(),
    }))
}

async fn sales_history(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.board.history())
}

// --- Auth helpers ---

fn extract_bearer_from_headers(headers: &HeaderMap) -> Result<String, (StatusCode, String)> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .ok_or_else(|| AuthError::MissingToken.into())
}

fn verify_bearer(token: &str, state: &AppState) -> Result<UserIdentity, (StatusCode, String)> {
    state.tokens.verify(token).map_err(|e| {
        tracing::warn!(error = %e, "bearer rejected");
        e.into()
    })
}
