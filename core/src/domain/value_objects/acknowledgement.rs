//! Acknowledgement of an irreversible operation.

use serde::{Deserialize, Serialize};

/// Returned once the provider has confirmed an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub success: bool,
}

impl Acknowledgement {
    pub fn confirmed() -> Self {
        Self { success: true }
    }
}
