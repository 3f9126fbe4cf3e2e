//! HTTP calls against the board API.

pub mod ws;

use anyhow::Result;
use shared::{ReportSaleRequest, ReportSaleResponse, TokenRequest, TokenResponse};

/// Exchange username/password for a bearer token.
pub async fn login(base_url: &str, username: &str, password: &str) -> Result<String> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/api/auth/token", base_url))
        .json(&TokenRequest {
            username: username.to_string(),
            password: password.to_string(),
        })
        .send()
        .await?;
    if !res.status().is_success() {
        let err: String = res.text().await.unwrap_or_default();
        anyhow::bail!("Login failed: {}", err);
    }
    let body: TokenResponse = res.json().await?;
    if let Some(ref exp) = body.expires_at {
        tracing::debug!(expires_at = %exp, "token issued");
    }
    Ok(body.access_token)
}

/// Report a sale; returns the event the board recorded.
pub async fn report_sale(base_url: &str, token: &str, message: &str) -> Result<String> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/api/sales", base_url))
        .bearer_auth(token)
        .json(&ReportSaleRequest {
            message: message.to_string(),
        })
        .send()
        .await?;
    if !res.status().is_success() {
        let status = res.status();
        let err: String = res.text().await.unwrap_or_default();
        anyhow::bail!("Report failed ({}): {}", status, err);
    }
    let body: ReportSaleResponse = res.json().await?;
    Ok(body.event)
}

/// Full board history, oldest first.
pub async fn fetch_history(base_url: &str) -> Result<Vec<String>> {
    let res = reqwest::get(format!("{}/api/sales", base_url)).await?;
    if !res.status().is_success() {
        anyhow::bail!("History failed: {}", res.status());
    }
    Ok(res.json().await?)
}
