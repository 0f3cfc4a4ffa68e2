//! Credential login through the full app

mod common;

use actix_web::{http::StatusCode, test};
use cg_api::app::create_app;
use serde_json::{json, Value};

use common::{TestContext, ADMIN_EMAIL, ADMIN_ID, NURSE_EMAIL, SEEDED_CREDENTIAL};

#[actix_web::test]
async fn test_login_issues_usable_token() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.origins)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({"email": ADMIN_EMAIL, "credential": SEEDED_CREDENTIAL}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["account"]["id"], ADMIN_ID);
    assert_eq!(body["account"]["role"], "admin");
    assert_eq!(body["expiresIn"], 3600);
    let token = body["token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/accounts")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_wrong_credential_and_unknown_email_look_the_same() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.origins)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({"email": NURSE_EMAIL, "credential": "wrong-credential"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let wrong: Value = test::read_body_json(resp).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({"email": "nobody@clinic.test", "credential": "wrong-credential"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let unknown: Value = test::read_body_json(resp).await;

    assert_eq!(wrong["error"], unknown["error"]);
    assert_eq!(wrong["message"], unknown["message"]);
}

#[actix_web::test]
async fn test_blank_email_is_rejected() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.origins)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({"email": "", "credential": SEEDED_CREDENTIAL}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["details"]["field"], "email");
}

#[actix_web::test]
async fn test_login_only_accepts_post() {
    let ctx = TestContext::new().await;
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.origins)).await;

    let req = test::TestRequest::get().uri("/api/v1/auth/login").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}
