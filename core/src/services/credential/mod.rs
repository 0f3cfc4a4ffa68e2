//! Credential Verifier
//!
//! Salted, deliberately slow one-way digests. Async wrappers move the
//! derivation onto the blocking pool so request workers keep serving.

mod service;

#[cfg(test)]
mod tests;

pub use service::{CredentialVerifier, DEFAULT_COST};
