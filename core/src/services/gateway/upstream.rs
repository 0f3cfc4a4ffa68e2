//! Bounded provider calls and upstream failure reporting

use std::future::Future;
use std::time::Duration;

use tracing::error;
use uuid::Uuid;

use crate::errors::{DomainError, ProviderError};

/// Await a provider call, failing with `Timeout` once `limit` elapses
pub(crate) async fn bounded<T, F>(limit: Duration, call: F) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    tokio::time::timeout(limit, call)
        .await
        .unwrap_or(Err(ProviderError::Timeout))
}

/// Log the provider detail under a fresh correlation id and return the opaque error
pub(crate) fn upstream(operation: &str, failure: &ProviderError) -> DomainError {
    let correlation_id = Uuid::new_v4();
    error!(
        %correlation_id,
        operation,
        error = %failure,
        "Identity provider call failed"
    );
    DomainError::Upstream { correlation_id }
}
