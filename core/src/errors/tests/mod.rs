use uuid::Uuid;

use super::{DomainError, ProviderError};

#[test]
fn test_error_codes() {
    assert_eq!(
        DomainError::validation("email", "must be a valid email address").code(),
        "VALIDATION_ERROR"
    );
    assert_eq!(DomainError::Forbidden.code(), "FORBIDDEN");
    assert_eq!(DomainError::NotFound.code(), "NOT_FOUND");
    assert_eq!(DomainError::Conflict.code(), "CONFLICT");
    assert_eq!(DomainError::Unauthenticated.code(), "UNAUTHENTICATED");
}

#[test]
fn test_upstream_message_carries_only_correlation_id() {
    let correlation_id = Uuid::new_v4();
    let error = DomainError::Upstream { correlation_id };
    let message = error.to_string();

    assert!(message.contains(&correlation_id.to_string()));
    assert_eq!(error.code(), "UPSTREAM_ERROR");
}

#[test]
fn test_validation_message_names_field() {
    let error = DomainError::validation("credential", "must be between 8 and 72 bytes");
    assert_eq!(
        error.to_string(),
        "Validation error on credential: must be between 8 and 72 bytes"
    );
}

#[test]
fn test_provider_error_display() {
    let error = ProviderError::Unexpected {
        status: 500,
        body: "boom".to_string(),
    };
    assert_eq!(error.to_string(), "unexpected provider response (status 500): boom");
}
