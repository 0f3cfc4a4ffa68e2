//! Authentication service module
//!
//! Credential login against digests stored by the identity provider,
//! issuing a session token on success.

mod service;

#[cfg(test)]
mod tests;

pub use service::AuthService;
