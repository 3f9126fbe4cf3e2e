//! Authentication: in-memory user records and pluggable bearer-token schemes.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use axum::http::StatusCode;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::{AuthMode, Config, UserSeed};

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub username: String,
}

/// A bearer token handed out by the token endpoint.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    /// `%Y-%m-%dT%H:%M:%SZ`, None when the token never expires.
    pub expires_at: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing authorization")]
    MissingToken,
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingToken | Self::InvalidToken | Self::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AuthError> for (StatusCode, String) {
    fn from(e: AuthError) -> Self {
        (e.status(), e.to_string())
    }
}

/// Issues and checks bearer tokens. Handlers only see this trait.
pub trait TokenScheme: Send + Sync {
    fn issue(&self, user: &UserIdentity) -> Result<IssuedToken, AuthError>;
    fn verify(&self, token: &str) -> Result<UserIdentity, AuthError>;
}

/// Username -> bcrypt password hash.
#[derive(Debug, Default)]
pub struct UserStore {
    users: HashMap<String, String>,
}

impl UserStore {
    /// Hash every seeded password. Later entries for the same username win.
    pub fn from_seeds(seeds: &[UserSeed], bcrypt_cost: u32) -> Result<Self> {
        let mut users = HashMap::with_capacity(seeds.len());
        for seed in seeds {
            let hash = bcrypt::hash(&seed.password, bcrypt_cost)?;
            users.insert(seed.username.clone(), hash);
        }
        Ok(Self { users })
    }

    pub fn lookup(&self, username: &str) -> Option<UserIdentity> {
        self.users.contains_key(username).then(|| UserIdentity {
            username: username.to_string(),
        })
    }

    /// Check a username/password pair.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<UserIdentity, AuthError> {
        let Some(hash) = self.users.get(username) else {
            return Err(AuthError::InvalidCredentials);
        };
        if !bcrypt::verify(password, hash).unwrap_or(false) {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(UserIdentity {
            username: username.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// Token is literally the username. Insecure stand-in for a real session scheme.
pub struct PlaceholderTokens {
    users: Arc<UserStore>,
}

impl PlaceholderTokens {
    pub fn new(users: Arc<UserStore>) -> Self {
        Self { users }
    }
}

impl TokenScheme for PlaceholderTokens {
    fn issue(&self, user: &UserIdentity) -> Result<IssuedToken, AuthError> {
        Ok(IssuedToken {
            token: user.username.clone(),
            expires_at: None,
        })
    }

    fn verify(&self, token: &str) -> Result<UserIdentity, AuthError> {
        self.users.lookup(token).ok_or(AuthError::InvalidToken)
    }
}

/// JWT claims.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // username
    pub exp: i64,
    pub iat: i64,
}

/// HS256 JWTs. A token for a user no longer in the store is rejected.
pub struct JwtTokens {
    users: Arc<UserStore>,
    secret: String,
    ttl_secs: u64,
}

impl JwtTokens {
    pub fn new(users: Arc<UserStore>, secret: String, ttl_secs: u64) -> Self {
        Self {
            users,
            secret,
            ttl_secs,
        }
    }
}

impl TokenScheme for JwtTokens {
    fn issue(&self, user: &UserIdentity) -> Result<IssuedToken, AuthError> {
        let (token, exp) = create_jwt(&user.username, &self.secret, self.ttl_secs)?;
        let expires_at = chrono::DateTime::<chrono::Utc>::from_timestamp(exp, 0)
            .map(|t| t.format("%Y-%m-%dT%H:%M:%SZ").to_string());
        Ok(IssuedToken { token, expires_at })
    }

    fn verify(&self, token: &str) -> Result<UserIdentity, AuthError> {
        let username = validate_jwt(token, &self.secret).ok_or(AuthError::InvalidToken)?;
        self.users.lookup(&username).ok_or(AuthError::InvalidToken)
    }
}

/// Create JWT for `username`. Returns the token and its `exp`.
pub fn create_jwt(username: &str, secret: &str, ttl_secs: u64) -> Result<(String, i64)> {
    let now = chrono::Utc::now().timestamp();
    let exp = now + ttl_secs as i64;
    let claims = Claims {
        sub: username.to_string(),
        exp,
        iat: now,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok((token, exp))
}

/// Validate JWT (signature and expiry) and return the username.
pub fn validate_jwt(token: &str, secret: &str) -> Option<String> {
    let mut validation = Validation::default();
    validation.validate_exp = true;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .ok()
    .map(|data| data.claims.sub)
}

/// Generate a random signing secret (hex).
pub fn generate_secret() -> String {
    let bytes: [u8; 32] = rand::random();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Pick the token scheme named by the config.
pub fn token_scheme(config: &Config, users: Arc<UserStore>) -> Arc<dyn TokenScheme> {
    match config.auth_mode {
        AuthMode::Placeholder => {
            tracing::warn!("AUTH_MODE=placeholder: bearer token is the username, do not expose this server");
            Arc::new(PlaceholderTokens::new(users))
        }
        AuthMode::Jwt => {
            let secret = config.jwt_secret.clone().unwrap_or_else(|| {
                tracing::warn!("JWT_SECRET not set, tokens will not survive a restart");
                generate_secret()
            });
            Arc::new(JwtTokens::new(users, secret, config.jwt_ttl_secs))
        }
    }
}
