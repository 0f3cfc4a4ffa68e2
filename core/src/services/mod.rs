//! Business services containing domain logic and use cases.

pub mod audit;
pub mod auth;
pub mod authorization;
pub mod credential;
pub mod gateway;
pub mod token;

// Re-export commonly used types
pub use audit::{AuditService, AuditServiceConfig};
pub use auth::AuthService;
pub use authorization::{is_permitted, PermissionPolicy};
pub use credential::CredentialVerifier;
pub use gateway::{AccountListing, CreateAccountRequest, ElevatedOperationGateway, GatewayConfig};
pub use token::{IssuedToken, TokenService, TokenServiceConfig};
