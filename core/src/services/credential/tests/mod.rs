//! Tests for the credential verifier

use crate::domain::entities::{Credential, CredentialDigest};
use crate::services::credential::CredentialVerifier;

fn verifier() -> CredentialVerifier {
    CredentialVerifier::new(4 /* bcrypt minimum cost */).unwrap()
}

#[test]
fn test_digest_then_verify_matches() {
    let verifier = verifier();
    let digest = verifier.digest(&Credential::new("validpass1")).unwrap();

    assert!(verifier.verify(&Credential::new("validpass1"), &digest));
}

#[test]
fn test_different_credential_does_not_match() {
    let verifier = verifier();
    let digest = verifier.digest(&Credential::new("validpass2")).unwrap();

    assert!(!verifier.verify(&Credential::new("validpass1"), &digest));
}

#[test]
fn test_digests_are_salted() {
    let verifier = verifier();
    let first = verifier.digest(&Credential::new("validpass1")).unwrap();
    let second = verifier.digest(&Credential::new("validpass1")).unwrap();

    assert_ne!(first, second);
    assert!(!first.as_str().contains("validpass1"));
}

#[test]
fn test_plaintext_stored_value_never_matches() {
    let verifier = verifier();
    let plaintext_as_digest = CredentialDigest::from_stored("validpass1");

    assert!(!verifier.verify(&Credential::new("validpass1"), &plaintext_as_digest));
}

#[test]
fn test_cost_is_encoded_in_digest() {
    let verifier = verifier();
    let digest = verifier.digest(&Credential::new("validpass1")).unwrap();

    assert!(digest.as_str().starts_with("$2b$04$"));
    assert_eq!(verifier.cost(), 4);
}

#[test]
fn test_invalid_cost_is_rejected() {
    assert!(CredentialVerifier::new(3).is_err());
    assert!(CredentialVerifier::new(32).is_err());
}

#[tokio::test]
async fn test_blocking_wrappers() {
    let verifier = verifier();
    let digest = verifier
        .digest_blocking(Credential::new("validpass1"))
        .await
        .unwrap();

    assert!(verifier.verify_blocking(Credential::new("validpass1"), digest.clone()).await);
    assert!(!verifier.verify_blocking(Credential::new("wrongpass1"), digest).await);
    verifier.verify_dummy_blocking(Credential::new("whatever1")).await;
}
