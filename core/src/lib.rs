//! # Clinic Gate Core
//!
//! Domain layer for the Clinic Gate backend: account and credential
//! entities, the identity provider port, the credential verifier, the
//! authorization policy and the elevated operation gateway.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    AccountId, AccountIdentity, AccountPage, AuditOutcome, AuditRecord, AuthorizationContext,
    Caller, Claims, Credential, CredentialDigest, Operation, PageRequest, ProvisionAccount, Role,
    StoredCredential,
};
pub use domain::value_objects::{Acknowledgement, LoginResult};
pub use errors::{DomainError, DomainResult, ProviderError};
pub use repositories::{
    AuditLogRepository, IdentityProvider, InMemoryAuditLogRepository, InMemoryIdentityProvider,
    NoOpAuditLogRepository, TracingAuditLogRepository,
};
pub use services::{
    AccountListing, AuditService, AuditServiceConfig, AuthService, CreateAccountRequest,
    CredentialVerifier, ElevatedOperationGateway, GatewayConfig, PermissionPolicy, TokenService,
    TokenServiceConfig,
};
