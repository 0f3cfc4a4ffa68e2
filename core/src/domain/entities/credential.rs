//! Plaintext credentials and their one-way digests.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use crate::domain::entities::account::AccountIdentity;

/// Minimum credential length in bytes
pub const MIN_CREDENTIAL_BYTES: usize = 8;

/// bcrypt only consumes the first 72 bytes of its input
pub const MAX_CREDENTIAL_BYTES: usize = 72;

/// A plaintext credential, wiped from memory on drop
///
/// Not `Clone`, not `Serialize`; its `Debug` output is redacted.
pub struct Credential(SecretString);

impl Credential {
    pub fn new(plaintext: impl Into<String>) -> Self {
        Self(SecretString::from(plaintext.into()))
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.0.expose_secret().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn meets_length_policy(&self) -> bool {
        (MIN_CREDENTIAL_BYTES..=MAX_CREDENTIAL_BYTES).contains(&self.len())
    }

    pub(crate) fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// Opaque bcrypt digest; the only durable form of a credential
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialDigest(String);

impl CredentialDigest {
    /// Wrap a digest read back from the identity provider
    pub fn from_stored(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CredentialDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialDigest(..)")
    }
}

/// Account together with its stored digest, as returned for login checks
#[derive(Debug, Clone)]
pub struct StoredCredential {
    pub account: AccountIdentity,
    pub digest: CredentialDigest,
}
