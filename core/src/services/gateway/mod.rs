//! Elevated Operation Gateway
//!
//! Create, delete, change-role and list operations executed with the
//! elevated provider credential on behalf of an authorized caller. Includes
//! the lazy account listing and the bounded provider-call helpers shared
//! with the login service.

mod config;
mod listing;
mod service;
mod types;
pub(crate) mod upstream;

#[cfg(test)]
mod tests;

pub use config::{GatewayConfig, DEFAULT_PAGE_SIZE, DEFAULT_PROVIDER_TIMEOUT, MAX_PAGE_SIZE};
pub use listing::{AccountListing, MAX_LISTING_PAGES};
pub use service::ElevatedOperationGateway;
pub use types::CreateAccountRequest;
