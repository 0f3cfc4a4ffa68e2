//! Unit tests for token service

use chrono::{Duration, Utc};
use secrecy::SecretString;

use crate::domain::entities::{AccountIdentity, Claims, Role};
use crate::errors::DomainError;
use crate::services::token::{TokenService, TokenServiceConfig};

fn secret(value: &str) -> SecretString {
    SecretString::from(value.to_string())
}

fn service() -> TokenService {
    TokenService::new(
        &secret("an-hs256-signing-secret-of-32-chars!!"),
        TokenServiceConfig::default(),
    )
}

fn account() -> AccountIdentity {
    AccountIdentity::new("1", "admin@clinic.org", Role::Admin)
}

#[test]
fn test_issue_and_verify() {
    let service = service();
    let issued = service.issue(&account()).unwrap();

    assert_eq!(issued.expires_in, 3600);

    let claims = service.verify(&issued.token).unwrap();
    assert_eq!(claims.sub, "1");
    assert_eq!(claims.email, "admin@clinic.org");
    assert_eq!(claims.role, "admin");
    assert_eq!(claims.iss, "clinic-gate");
    assert_eq!(claims.aud, "clinic-gate-api");
}

#[test]
fn test_token_from_other_secret_is_rejected() {
    let issued = service().issue(&account()).unwrap();
    let other = TokenService::new(
        &secret("a-completely-different-secret-value!!"),
        TokenServiceConfig::default(),
    );

    assert_eq!(other.verify(&issued.token), Err(DomainError::Unauthenticated));
}

#[test]
fn test_expired_token_is_rejected() {
    let service = service();
    let mut claims = Claims::for_account(&account(), Duration::minutes(60));
    claims.iat = Utc::now().timestamp() - 7200;
    claims.nbf = claims.iat;
    claims.exp = Utc::now().timestamp() - 3600;

    let token = service.encode_jwt(&claims).unwrap();
    assert_eq!(service.verify(&token), Err(DomainError::Unauthenticated));
}

#[test]
fn test_wrong_audience_is_rejected() {
    let service = service();
    let mut claims = Claims::for_account(&account(), Duration::minutes(60));
    claims.aud = "someone-else".to_string();

    let token = service.encode_jwt(&claims).unwrap();
    assert_eq!(service.verify(&token), Err(DomainError::Unauthenticated));
}

#[test]
fn test_garbage_is_rejected() {
    assert_eq!(service().verify("not.a.jwt"), Err(DomainError::Unauthenticated));
    assert_eq!(service().verify(""), Err(DomainError::Unauthenticated));
}

#[test]
fn test_configured_ttl() {
    let service = TokenService::new(
        &secret("an-hs256-signing-secret-of-32-chars!!"),
        TokenServiceConfig::with_ttl(std::time::Duration::from_secs(900)),
    );
    assert_eq!(service.issue(&account()).unwrap().expires_in, 900);
}
