//! Shared fixture: the real app over an in-memory identity provider

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use cg_api::app::AppState;
use cg_api::middleware::{RateLimitConfig, RateLimiter};
use cg_core::{
    AccountIdentity, AuthService, Credential, CredentialVerifier, ElevatedOperationGateway,
    GatewayConfig, InMemoryIdentityProvider, PermissionPolicy, Role, TokenService,
    TokenServiceConfig,
};
use secrecy::SecretString;

pub const ADMIN_ID: &str = "1";
pub const ADMIN_EMAIL: &str = "admin@clinic.test";
pub const NURSE_ID: &str = "9";
pub const NURSE_EMAIL: &str = "nurse@clinic.test";
pub const PATIENT_ID: &str = "42";
pub const PATIENT_EMAIL: &str = "patient42@clinic.test";

/// Credential of every seeded account
pub const SEEDED_CREDENTIAL: &str = "correct-horse-1";

const SIGNING_SECRET: &str = "test-signing-secret-that-is-long-enough";

pub struct TestContext {
    pub provider: Arc<InMemoryIdentityProvider>,
    pub token_service: Arc<TokenService>,
    pub state: web::Data<AppState<InMemoryIdentityProvider>>,
    pub origins: Vec<String>,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_rate_limit(RateLimitConfig::default()).await
    }

    pub async fn with_rate_limit(rate_limit: RateLimitConfig) -> Self {
        let provider = Arc::new(InMemoryIdentityProvider::new());
        let verifier = Arc::new(CredentialVerifier::new(4).unwrap());

        let digest = verifier.digest(&Credential::new(SEEDED_CREDENTIAL)).unwrap();
        for (id, email, role) in [
            (ADMIN_ID, ADMIN_EMAIL, Role::Admin),
            (NURSE_ID, NURSE_EMAIL, Role::Nurse),
            (PATIENT_ID, PATIENT_EMAIL, Role::Patient),
        ] {
            provider
                .insert(AccountIdentity::new(id, email, role), digest.clone())
                .await;
        }

        let token_service = Arc::new(TokenService::new(
            &SecretString::from(SIGNING_SECRET.to_string()),
            TokenServiceConfig::default(),
        ));
        let gateway: Arc<ElevatedOperationGateway<InMemoryIdentityProvider>> =
            Arc::new(ElevatedOperationGateway::new(
                Arc::clone(&provider),
                Arc::clone(&verifier),
                Arc::new(PermissionPolicy::default()),
                GatewayConfig::default(),
            ));
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&provider),
            verifier,
            Arc::clone(&token_service),
            Duration::from_secs(5),
        ));

        Self {
            provider,
            state: web::Data::new(
                AppState::new(gateway, auth_service, Arc::clone(&token_service))
                    .with_rate_limiter(RateLimiter::new(rate_limit)),
            ),
            token_service,
            origins: vec!["https://clinic.test".to_string()],
        }
    }

    /// `Authorization` header value for a session as `id`
    ///
    /// `role` only goes into the token; the app must ignore it.
    pub fn bearer(&self, id: &str, email: &str, role: Role) -> String {
        let issued = self
            .token_service
            .issue(&AccountIdentity::new(id, email, role))
            .unwrap();
        format!("Bearer {}", issued.token)
    }

    pub fn admin(&self) -> String {
        self.bearer(ADMIN_ID, ADMIN_EMAIL, Role::Admin)
    }

    pub fn nurse(&self) -> String {
        self.bearer(NURSE_ID, NURSE_EMAIL, Role::Nurse)
    }
}
