//! Shared request/response models.

use serde::{Deserialize, Serialize};

/// Token type reported by the token endpoint.
pub const TOKEN_TYPE_BEARER: &str = "bearer";

/// Root endpoint payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub message: String,
}

// --- Auth DTOs ---

/// Token request: exchange username/password for a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// Token response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// RFC 3339 expiry, absent for tokens that never expire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

// --- Sales DTOs ---

/// Out-of-band sale report (authenticated HTTP ingress).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSaleRequest {
    pub message: String,
}

/// The event recorded for a reported sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSaleResponse {
    pub event: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_omits_missing_expiry() {
        let resp = TokenResponse {
            access_token: "johndoe".to_string(),
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_at: None,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"access_token": "johndoe", "token_type": "bearer"})
        );
    }

    #[test]
    fn token_response_accepts_missing_expiry() {
        let resp: TokenResponse =
            serde_json::from_str(r#"{"access_token":"t","token_type":"bearer"}"#).unwrap();
        assert_eq!(resp.expires_at, None);
    }
}
