//! Request types for gateway operations

use std::collections::HashMap;

use crate::domain::entities::{Credential, Role};

/// Input to `create_account`
///
/// Owns the plaintext credential so it can be moved onto the blocking pool
/// and dropped as soon as the digest exists.
#[derive(Debug)]
pub struct CreateAccountRequest {
    pub email: String,
    pub credential: Credential,
    pub role: Role,
    pub metadata: HashMap<String, String>,
}

impl CreateAccountRequest {
    pub fn new(email: impl Into<String>, credential: Credential, role: Role) -> Self {
        Self {
            email: email.into(),
            credential,
            role,
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }
}
