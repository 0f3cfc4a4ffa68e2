//! Domain entities representing core business objects.

pub mod account;
pub mod audit;
pub mod credential;
pub mod operation;
pub mod token;

// Re-export commonly used types
pub use account::{
    AccountId, AccountIdentity, AccountPage, PageRequest, ProvisionAccount, Role, UnknownRole,
};
pub use audit::{AuditOutcome, AuditRecord};
pub use credential::{
    Credential, CredentialDigest, StoredCredential, MAX_CREDENTIAL_BYTES, MIN_CREDENTIAL_BYTES,
};
pub use operation::{AuthorizationContext, Caller, Operation};
pub use token::{Claims, JWT_AUDIENCE, JWT_ISSUER, SESSION_TOKEN_EXPIRY_MINUTES};
