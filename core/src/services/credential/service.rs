//! bcrypt-backed credential verifier

use tracing::debug;

use crate::domain::entities::{Credential, CredentialDigest};
use crate::errors::{DomainError, DomainResult};

/// Production work factor
pub const DEFAULT_COST: u32 = 12;

/// Derives and checks salted one-way credential digests
///
/// There is no plaintext comparison path in any environment. Verification
/// delegates to `bcrypt::verify`, which compares derived hashes in constant
/// time.
#[derive(Clone)]
pub struct CredentialVerifier {
    cost: u32,
    /// Digest of a random value, used to spend the same time on unknown accounts
    dummy_digest: CredentialDigest,
}

impl CredentialVerifier {
    /// Create a verifier with the given bcrypt cost (4..=31)
    pub fn new(cost: u32) -> DomainResult<Self> {
        let seed = uuid::Uuid::new_v4().to_string();
        let dummy = bcrypt::hash(seed, cost).map_err(|_| {
            DomainError::validation("credential_hash_cost", "must be between 4 and 31")
        })?;

        Ok(Self {
            cost,
            dummy_digest: CredentialDigest::from_stored(dummy),
        })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Derive a fresh digest with a random salt
    pub fn digest(&self, credential: &Credential) -> DomainResult<CredentialDigest> {
        bcrypt::hash(credential.expose(), self.cost)
            .map(CredentialDigest::from_stored)
            .map_err(|e| DomainError::Internal {
                message: format!("credential derivation failed: {}", e),
            })
    }

    /// A malformed digest verifies as `false`
    pub fn verify(&self, credential: &Credential, digest: &CredentialDigest) -> bool {
        match bcrypt::verify(credential.expose(), digest.as_str()) {
            Ok(matched) => matched,
            Err(e) => {
                debug!(error = %e, "Stored digest could not be parsed");
                false
            }
        }
    }

    /// Spend one verification on a throwaway digest
    pub fn verify_dummy(&self, credential: &Credential) {
        let _ = self.verify(credential, &self.dummy_digest);
    }

    /// `digest` on the blocking pool
    pub async fn digest_blocking(&self, credential: Credential) -> DomainResult<CredentialDigest> {
        let verifier = self.clone();
        tokio::task::spawn_blocking(move || verifier.digest(&credential))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("digest task failed: {}", e),
            })?
    }

    /// `verify` on the blocking pool; the credential is dropped when done
    pub async fn verify_blocking(&self, credential: Credential, digest: CredentialDigest) -> bool {
        let verifier = self.clone();
        tokio::task::spawn_blocking(move || verifier.verify(&credential, &digest))
            .await
            .unwrap_or(false)
    }

    /// `verify_dummy` on the blocking pool
    pub async fn verify_dummy_blocking(&self, credential: Credential) {
        let verifier = self.clone();
        let _ = tokio::task::spawn_blocking(move || verifier.verify_dummy(&credential)).await;
    }
}
