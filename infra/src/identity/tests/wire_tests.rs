use std::collections::HashMap;

use cg_core::{CredentialDigest, ProviderError, Role};
use reqwest::StatusCode;

use crate::identity::wire::{
    classify_status, decode, decode_credential, decode_delete_result, CreateUserBody,
    ListUsersResponse, ProviderUser, RoleClaim,
};

#[test]
fn test_status_mapping() {
    assert_eq!(classify_status(StatusCode::NOT_FOUND, ""), ProviderError::NotFound);
    assert_eq!(
        classify_status(StatusCode::UNAUTHORIZED, "invalid JWT"),
        ProviderError::Forbidden
    );
    assert_eq!(classify_status(StatusCode::FORBIDDEN, ""), ProviderError::Forbidden);
    assert_eq!(classify_status(StatusCode::CONFLICT, ""), ProviderError::Conflict);
}

#[test]
fn test_duplicate_email_is_conflict() {
    let legacy = r#"{"code":422,"msg":"A user with this email address has already been registered"}"#;
    let current = r#"{"code":422,"error_code":"email_exists","msg":"Email address already exists"}"#;

    assert_eq!(
        classify_status(StatusCode::UNPROCESSABLE_ENTITY, legacy),
        ProviderError::Conflict
    );
    assert_eq!(
        classify_status(StatusCode::UNPROCESSABLE_ENTITY, current),
        ProviderError::Conflict
    );
}

#[test]
fn test_other_statuses_are_unexpected_with_bounded_body() {
    let long_body = "x".repeat(4096);
    match classify_status(StatusCode::INTERNAL_SERVER_ERROR, &long_body) {
        ProviderError::Unexpected { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body.len(), 512);
        }
        other => panic!("expected Unexpected, got {:?}", other),
    }

    assert!(matches!(
        classify_status(StatusCode::UNPROCESSABLE_ENTITY, r#"{"msg":"weak password"}"#),
        ProviderError::Unexpected { status: 422, .. }
    ));
}

#[test]
fn test_decode_provider_user() {
    let body = br#"{
        "id": "6a1f0c2e-6a9b-4a43-8f3e-2b5f7f3d9c11",
        "email": "nurse@clinic.test",
        "app_metadata": {"provider": "email", "role": "nurse"},
        "user_metadata": {"ward": "B2", "floor": 3, "email_verified": true, "tags": ["a"]}
    }"#;

    let account = decode::<ProviderUser>(body).unwrap().into_identity().unwrap();

    assert_eq!(account.id.as_str(), "6a1f0c2e-6a9b-4a43-8f3e-2b5f7f3d9c11");
    assert_eq!(account.email, "nurse@clinic.test");
    assert_eq!(account.role, Role::Nurse);
    assert_eq!(account.metadata.get("ward").map(String::as_str), Some("B2"));
    assert_eq!(account.metadata.get("floor").map(String::as_str), Some("3"));
    assert_eq!(
        account.metadata.get("email_verified").map(String::as_str),
        Some("true")
    );
    assert!(!account.metadata.contains_key("tags"));
}

#[test]
fn test_missing_role_defaults_to_patient() {
    let body = br#"{"id": "7", "email": "p@clinic.test", "app_metadata": null}"#;
    let account = decode::<ProviderUser>(body).unwrap().into_identity().unwrap();
    assert_eq!(account.role, Role::Patient);
    assert!(account.metadata.is_empty());
}

#[test]
fn test_unknown_role_is_decode_error() {
    let body = br#"{"id": "7", "email": "p@clinic.test", "app_metadata": {"role": "superuser"}}"#;
    let result = decode::<ProviderUser>(body).unwrap().into_identity();
    assert!(matches!(result, Err(ProviderError::Decode(_))));

    let body = br#"{"id": "7", "email": "p@clinic.test", "app_metadata": {"role": 1}}"#;
    let result = decode::<ProviderUser>(body).unwrap().into_identity();
    assert!(matches!(result, Err(ProviderError::Decode(_))));
}

#[test]
fn test_decode_error_does_not_echo_body() {
    let result = decode::<ProviderUser>(br#"{"id": "$2b$12$secretlookingvalue", "email": 5}"#);
    match result {
        Err(ProviderError::Decode(message)) => assert!(!message.contains("secretlooking")),
        other => panic!("expected Decode, got {:?}", other.map(|u| u.id)),
    }
}

#[test]
fn test_decode_user_list() {
    let body = br#"{"users": [
        {"id": "1", "email": "a@clinic.test", "app_metadata": {"role": "admin"}},
        {"id": "2", "email": "b@clinic.test", "app_metadata": {"role": "x-ray"}}
    ], "aud": "authenticated"}"#;

    let response: ListUsersResponse = decode(body).unwrap();
    let roles: Vec<Role> = response
        .users
        .into_iter()
        .map(|u| u.into_identity().unwrap().role)
        .collect();
    assert_eq!(roles, vec![Role::Admin, Role::Xray]);

    let empty: ListUsersResponse = decode(br#"{"aud": "authenticated"}"#).unwrap();
    assert!(empty.users.is_empty());
}

#[test]
fn test_delete_result() {
    assert_eq!(decode_delete_result(b"true"), Ok(true));
    assert_eq!(decode_delete_result(b"false"), Ok(false));
    assert_eq!(decode_delete_result(b"null"), Ok(false));
    assert!(matches!(
        decode_delete_result(br#"{"deleted": true}"#),
        Err(ProviderError::Decode(_))
    ));
}

#[test]
fn test_credential_row_shapes() {
    let object = br#"{"id": "1", "email": "a@clinic.test", "role": "admin", "digest": "$2b$04$abc"}"#;
    let stored = decode_credential(object).unwrap().unwrap();
    assert_eq!(stored.account.role, Role::Admin);
    assert_eq!(stored.digest, CredentialDigest::from_stored("$2b$04$abc"));

    let array = br#"[{"id": "2", "email": "b@clinic.test", "digest": "$2b$04$def"}]"#;
    let stored = decode_credential(array).unwrap().unwrap();
    assert_eq!(stored.account.id.as_str(), "2");
    assert_eq!(stored.account.role, Role::Patient);

    assert!(decode_credential(b"null").unwrap().is_none());
    assert!(decode_credential(b"[]").unwrap().is_none());
}

#[test]
fn test_account_without_digest_is_absent() {
    let row = br#"{"id": "3", "email": "sso@clinic.test", "role": "doctor", "digest": ""}"#;
    assert!(decode_credential(row).unwrap().is_none());

    let row = br#"{"id": "3", "email": "sso@clinic.test", "role": "doctor", "digest": null}"#;
    assert!(decode_credential(row).unwrap().is_none());
}

#[test]
fn test_create_body_shape() {
    let mut metadata = HashMap::new();
    metadata.insert("ward".to_string(), "B2".to_string());

    let body = CreateUserBody {
        email: "lab@clinic.test",
        password_hash: "$2b$04$abc",
        email_confirm: true,
        user_metadata: &metadata,
        app_metadata: RoleClaim { role: Role::Lab },
    };
    let json = serde_json::to_value(&body).unwrap();

    assert_eq!(json["email"], "lab@clinic.test");
    assert_eq!(json["password_hash"], "$2b$04$abc");
    assert_eq!(json["email_confirm"], true);
    assert_eq!(json["app_metadata"]["role"], "lab");
    assert_eq!(json["user_metadata"]["ward"], "B2");
    assert!(json.get("password").is_none());
}
