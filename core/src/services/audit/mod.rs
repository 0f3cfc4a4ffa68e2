//! Audit service module for recording privileged operation outcomes.

mod service;

pub use service::{AuditService, AuditServiceConfig};

#[cfg(test)]
mod tests;
