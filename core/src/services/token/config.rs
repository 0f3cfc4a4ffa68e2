//! Configuration for the token service

use chrono::Duration;

use crate::domain::entities::{JWT_AUDIENCE, JWT_ISSUER, SESSION_TOKEN_EXPIRY_MINUTES};

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Session token lifetime
    pub ttl: Duration,
    pub issuer: String,
    pub audience: String,
}

impl TokenServiceConfig {
    pub fn with_ttl(ttl: std::time::Duration) -> Self {
        Self {
            ttl: Duration::seconds(ttl.as_secs() as i64),
            ..Self::default()
        }
    }
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::minutes(SESSION_TOKEN_EXPIRY_MINUTES),
            issuer: JWT_ISSUER.to_string(),
            audience: JWT_AUDIENCE.to_string(),
        }
    }
}
