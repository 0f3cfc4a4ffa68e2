//! Session token claims.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::account::{AccountId, AccountIdentity};

/// Default session token lifetime
pub const SESSION_TOKEN_EXPIRY_MINUTES: i64 = 60;

/// JWT issuer
pub const JWT_ISSUER: &str = "clinic-gate";

/// JWT audience
pub const JWT_AUDIENCE: &str = "clinic-gate-api";

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,

    pub email: String,

    /// Role at issue time; authorization always re-reads the current role
    pub role: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl Claims {
    /// Creates session claims for an account
    pub fn for_account(account: &AccountIdentity, ttl: Duration) -> Self {
        let now = Utc::now();
        let expiry = now + ttl;

        Self {
            sub: account.id.to_string(),
            email: account.email.clone(),
            role: account.role.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            nbf: now.timestamp(),
            iss: JWT_ISSUER.to_string(),
            aud: JWT_AUDIENCE.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    pub fn account_id(&self) -> AccountId {
        AccountId::new(self.sub.clone())
    }
}
