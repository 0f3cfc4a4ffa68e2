//! Login service: email and credential in, session token out

use std::sync::Arc;
use std::time::Duration;

use cg_shared::validation::validators;
use tracing::{info, warn};

use crate::domain::entities::Credential;
use crate::domain::value_objects::LoginResult;
use crate::errors::{DomainError, DomainResult};
use crate::repositories::IdentityProvider;
use crate::services::credential::CredentialVerifier;
use crate::services::gateway::upstream::{bounded, upstream};
use crate::services::token::TokenService;

/// Authentication service for credential login
pub struct AuthService<P>
where
    P: IdentityProvider,
{
    provider: Arc<P>,
    verifier: Arc<CredentialVerifier>,
    token_service: Arc<TokenService>,
    provider_timeout: Duration,
}

impl<P> AuthService<P>
where
    P: IdentityProvider,
{
    pub fn new(
        provider: Arc<P>,
        verifier: Arc<CredentialVerifier>,
        token_service: Arc<TokenService>,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            verifier,
            token_service,
            provider_timeout,
        }
    }

    /// Verify `credential` against the stored digest for `email`
    ///
    /// Unknown email and wrong credential both fail with `Unauthenticated`
    /// after one bcrypt verification, so neither message nor timing tells
    /// them apart.
    pub async fn login(&self, email: &str, credential: Credential) -> DomainResult<LoginResult> {
        let email = email.trim();
        if !validators::not_blank(email) {
            return Err(DomainError::validation("email", "is required"));
        }
        if credential.is_empty() {
            return Err(DomainError::validation("credential", "is required"));
        }

        let stored = bounded(self.provider_timeout, self.provider.find_credential(email))
            .await
            .map_err(|e| upstream("login", &e))?;

        let Some(stored) = stored else {
            self.verifier.verify_dummy_blocking(credential).await;
            warn!("Login rejected");
            return Err(DomainError::Unauthenticated);
        };

        if !self
            .verifier
            .verify_blocking(credential, stored.digest.clone())
            .await
        {
            warn!(account_id = %stored.account.id, "Login rejected");
            return Err(DomainError::Unauthenticated);
        }

        let issued = self.token_service.issue(&stored.account)?;
        info!(account_id = %stored.account.id, role = %stored.account.role, "Login succeeded");

        Ok(LoginResult::new(issued.token, issued.expires_in, stored.account))
    }
}
