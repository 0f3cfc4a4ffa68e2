//! Main token service implementation

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::domain::entities::{AccountIdentity, Claims};
use crate::errors::{DomainError, DomainResult};

use super::config::TokenServiceConfig;

/// A freshly signed session token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    /// Lifetime in seconds
    pub expires_in: i64,
}

/// Issues and verifies HS256 session tokens keyed by the signing secret
pub struct TokenService {
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(signing_secret: &SecretString, config: TokenServiceConfig) -> Self {
        let secret = signing_secret.expose_secret().as_bytes();
        let encoding_key = EncodingKey::from_secret(secret);
        let decoding_key = DecodingKey::from_secret(secret);

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Sign a session token for `account`
    pub fn issue(&self, account: &AccountIdentity) -> DomainResult<IssuedToken> {
        let mut claims = Claims::for_account(account, self.config.ttl);
        claims.iss = self.config.issuer.clone();
        claims.aud = self.config.audience.clone();

        let token = self.encode_jwt(&claims)?;
        Ok(IssuedToken {
            token,
            expires_in: self.config.ttl.num_seconds(),
        })
    }

    /// Encodes claims into a JWT
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> DomainResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(|e| {
            DomainError::Internal {
                message: format!("token signing failed: {}", e),
            }
        })
    }

    /// Verify signature, issuer, audience and validity window
    ///
    /// Every failure is `Unauthenticated`; the reason is only logged.
    pub fn verify(&self, token: &str) -> DomainResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let reason = match e.kind() {
                    ErrorKind::ExpiredSignature => "expired",
                    ErrorKind::ImmatureSignature => "not yet valid",
                    ErrorKind::InvalidSignature => "bad signature",
                    ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => "wrong issuer or audience",
                    _ => "malformed",
                };
                debug!(reason, "Session token rejected");
                DomainError::Unauthenticated
            })
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }
}
