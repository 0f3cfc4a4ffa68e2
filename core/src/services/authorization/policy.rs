//! Table-driven role to operation policy

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::domain::entities::{AuthorizationContext, Operation, Role};
use crate::errors::{DomainError, DomainResult};

/// Default grants: only administrators may run privileged operations
pub const DEFAULT_GRANTS: &[(Role, &[Operation])] = &[(Role::Admin, &Operation::ALL)];

/// Whether `role` may invoke `operation` under the default grants
pub fn is_permitted(role: Role, operation: Operation) -> bool {
    DEFAULT_GRANTS
        .iter()
        .any(|(granted, operations)| *granted == role && operations.contains(&operation))
}

/// Authorization Decision Point
///
/// Roles absent from the table are denied everything.
#[derive(Debug, Clone)]
pub struct PermissionPolicy {
    grants: HashMap<Role, HashSet<Operation>>,
}

impl PermissionPolicy {
    pub fn from_grants(rows: &[(Role, &[Operation])]) -> Self {
        let mut grants: HashMap<Role, HashSet<Operation>> = HashMap::new();
        for (role, operations) in rows {
            grants
                .entry(*role)
                .or_default()
                .extend(operations.iter().copied());
        }
        Self { grants }
    }

    pub fn is_permitted(&self, role: Role, operation: Operation) -> bool {
        self.grants
            .get(&role)
            .map_or(false, |operations| operations.contains(&operation))
    }

    /// `Forbidden` unless the caller's current role grants the operation
    pub fn authorize(&self, context: &AuthorizationContext<'_>) -> DomainResult<()> {
        if self.is_permitted(context.caller.role, context.operation) {
            Ok(())
        } else {
            debug!(
                caller_id = %context.caller.id,
                role = %context.caller.role,
                operation = %context.operation,
                "Operation denied by policy"
            );
            Err(DomainError::Forbidden)
        }
    }
}

impl Default for PermissionPolicy {
    fn default() -> Self {
        Self::from_grants(DEFAULT_GRANTS)
    }
}
