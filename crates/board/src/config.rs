//! Configuration for the board server.

use std::fmt;

use crate::broadcast::DEFAULT_QUEUE_CAPACITY;

/// Which bearer-token scheme guards the authenticated endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Token is the username. No signature, no expiry.
    Placeholder,
    /// HS256 JWT signed with `jwt_secret`.
    Jwt,
}

impl AuthMode {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "placeholder" => Some(Self::Placeholder),
            "jwt" => Some(Self::Jwt),
            _ => None,
        }
    }
}

/// A configured account: `user:password` in `BOARD_USERS`.
#[derive(Clone, PartialEq, Eq)]
pub struct UserSeed {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for UserSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserSeed")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid AUTH_MODE {0:?}, expected \"placeholder\" or \"jwt\"")]
    AuthMode(String),
    #[error("invalid BOARD_USERS entry {0:?}, expected user:password")]
    UserEntry(String),
}

/// Board configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub auth_mode: AuthMode,
    /// None means a random per-process secret is generated at startup.
    pub jwt_secret: Option<String>,
    pub jwt_ttl_secs: u64,
    pub users: Vec<UserSeed>,
    pub bcrypt_cost: u32,
    pub outbound_queue_capacity: usize,
    pub ws_ping_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);
        let jwt_secret = std::env::var("JWT_SECRET").ok().filter(|s| !s.is_empty());
        let auth_mode = match std::env::var("AUTH_MODE") {
            Ok(s) => AuthMode::parse(&s).ok_or(ConfigError::AuthMode(s))?,
            Err(_) if jwt_secret.is_some() => AuthMode::Jwt,
            Err(_) => AuthMode::Placeholder,
        };
        let jwt_ttl_secs = std::env::var("JWT_TTL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .unwrap_or(3600);
        let users = parse_users(
            &std::env::var("BOARD_USERS").unwrap_or_else(|_| "johndoe:secret".to_string()),
        )?;
        let outbound_queue_capacity = std::env::var("OUTBOUND_QUEUE_CAPACITY")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(DEFAULT_QUEUE_CAPACITY);
        let ws_ping_interval_secs = std::env::var("WS_PING_INTERVAL_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        Ok(Self {
            host,
            port,
            auth_mode,
            jwt_secret,
            jwt_ttl_secs,
            users,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            outbound_queue_capacity,
            ws_ping_interval_secs,
        })
    }

    /// Small-footprint config for tests: cheap bcrypt, no env lookups.
    pub fn for_test(auth_mode: AuthMode, users: &[(&str, &str)]) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            auth_mode,
            jwt_secret: Some("test-jwt-secret".to_string()),
            jwt_ttl_secs: 3600,
            users: users
                .iter()
                .map(|(u, p)| UserSeed {
                    username: u.to_string(),
                    password: p.to_string(),
                })
                .collect(),
            bcrypt_cost: 4,
            outbound_queue_capacity: DEFAULT_QUEUE_CAPACITY,
            ws_ping_interval_secs: 30,
        }
    }
}

/// Parse comma-separated `user:password` pairs. Blank entries are skipped.
pub fn parse_users(raw: &str) -> Result<Vec<UserSeed>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once(':') {
            Some((user, password)) if !user.trim().is_empty() && !password.is_empty() => {
                Ok(UserSeed {
                    username: user.trim().to_string(),
                    password: password.to_string(),
                })
            }
            _ => Err(ConfigError::UserEntry(entry.to_string())),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_user_pairs() {
        let users = parse_users("alice:pw1, bob:p:w ,").unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "alice");
        assert_eq!(users[0].password, "pw1");
        assert_eq!(users[1].username, "bob");
        assert_eq!(users[1].password, "p:w");
    }

    #[test]
    fn rejects_entry_without_password() {
        assert!(matches!(
            parse_users("alice"),
            Err(ConfigError::UserEntry(e)) if e == "alice"
        ));
        assert!(parse_users("alice:").is_err());
    }

    #[test]
    fn auth_mode_is_case_insensitive() {
        assert_eq!(AuthMode::parse("JWT"), Some(AuthMode::Jwt));
        assert_eq!(AuthMode::parse(" placeholder "), Some(AuthMode::Placeholder));
        assert_eq!(AuthMode::parse("basic"), None);
    }

    #[test]
    fn seed_debug_hides_password() {
        let seed = UserSeed {
            username: "alice".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(!format!("{:?}", seed).contains("hunter2"));
    }
}
