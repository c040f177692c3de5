//! Integration tests for authentication endpoints

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

const REGISTER: &str = "/api/v1/users/auth/register";
const LOGIN: &str = "/api/v1/users/auth/login";
const REFRESH: &str = "/api/v1/users/auth/refresh";
const ME: &str = "/api/v1/users/me";

async fn register(app: &common::TestApp, email: &str, password: &str) -> (StatusCode, Value) {
    let body = json!({
        "email": email,
        "password": password,
        "full_name": "Sam Shopper"
    });
    let (status, response) = app.post(REGISTER, &body.to_string()).await;
    (status, serde_json::from_str(&response).unwrap_or(Value::Null))
}

async fn login(app: &common::TestApp, email: &str, password: &str) -> (StatusCode, Value) {
    let body = json!({ "email": email, "password": password });
    let (status, response) = app.post(LOGIN, &body.to_string()).await;
    (status, serde_json::from_str(&response).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_register_success() {
    let app = common::TestApp::new();

    let (status, response) = register(&app, "shopper@example.com", "SecurePassword123!").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["email"], "shopper@example.com");
    assert_eq!(response["full_name"], "Sam Shopper");
    assert_eq!(response["is_active"], true);
    assert_eq!(response["roles"], json!(["customer"]));
    assert!(response.get("password_hash").is_none());
    assert!(response.get("access_token").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = common::TestApp::new();

    let (status, _) = register(&app, "dup@example.com", "SecurePassword123!").await;
    assert_eq!(status, StatusCode::CREATED);

    // Second registration differing only in case should fail
    let (status, response) = register(&app, "DUP@example.com", "AnotherPassword1").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(response["error"]["code"], "EMAIL_ALREADY_REGISTERED");
}

#[tokio::test]
async fn test_register_invalid_email() {
    let app = common::TestApp::new();

    let (status, response) = register(&app, "not-an-email", "SecurePassword123!").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"]["field"], "email");
}

#[tokio::test]
async fn test_register_password_limits() {
    let app = common::TestApp::new();

    let (status, _) = register(&app, "empty@example.com", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let too_long = "p".repeat(73);
    let (status, response) = register(&app, "long@example.com", &too_long).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"]["field"], "password");
}

#[tokio::test]
async fn test_login_success() {
    let app = common::TestApp::new();
    register(&app, "login@example.com", "SecurePassword123!").await;

    let (status, response) = login(&app, "login@example.com", "SecurePassword123!").await;

    assert_eq!(status, StatusCode::OK);
    assert!(!response["access_token"].as_str().unwrap().is_empty());
    assert!(!response["refresh_token"].as_str().unwrap().is_empty());
    assert_eq!(response["token_type"], "Bearer");
    assert_eq!(response["expires_in"], 900);
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_email_look_the_same() {
    let app = common::TestApp::new();
    register(&app, "wrong@example.com", "SecurePassword123!").await;

    let (wrong_status, wrong_body) = login(&app, "wrong@example.com", "WrongPassword").await;
    let (unknown_status, unknown_body) = login(&app, "nobody@example.com", "WrongPassword").await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn test_login_inactive_account_forbidden() {
    let app = common::TestApp::new();
    let (_, profile) = register(&app, "inactive@example.com", "SecurePassword123!").await;
    let id = profile["id"].as_i64().unwrap();

    let users = app.users.as_ref().unwrap();
    assert!(users.set_active(id, false).await);

    let (status, response) = login(&app, "inactive@example.com", "SecurePassword123!").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["error"]["code"], "ACCOUNT_INACTIVE");
}

#[tokio::test]
async fn test_me_returns_profile() {
    let app = common::TestApp::new();
    let (_, profile) = register(&app, "me@example.com", "SecurePassword123!").await;
    let (_, tokens) = login(&app, "me@example.com", "SecurePassword123!").await;

    let (status, body) = app
        .get_with_bearer(ME, tokens["access_token"].as_str().unwrap())
        .await;

    assert_eq!(status, StatusCode::OK);
    let me: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(me, profile);
}

#[tokio::test]
async fn test_me_rejects_refresh_token() {
    let app = common::TestApp::new();
    register(&app, "kind@example.com", "SecurePassword123!").await;
    let (_, tokens) = login(&app, "kind@example.com", "SecurePassword123!").await;

    let (status, body) = app
        .get_with_bearer(ME, tokens["refresh_token"].as_str().unwrap())
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error"]["code"], "WRONG_TOKEN_TYPE");
}

#[tokio::test]
async fn test_refresh_issues_usable_pair() {
    let app = common::TestApp::new();
    register(&app, "refresh@example.com", "SecurePassword123!").await;
    let (_, tokens) = login(&app, "refresh@example.com", "SecurePassword123!").await;

    let body = json!({ "refresh_token": tokens["refresh_token"] });
    let (status, response) = app.post(REFRESH, &body.to_string()).await;
    assert_eq!(status, StatusCode::OK);

    let pair: Value = serde_json::from_str(&response).unwrap();
    let (status, _) = app
        .get_with_bearer(ME, pair["access_token"].as_str().unwrap())
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_with_garbage_token() {
    let app = common::TestApp::new();

    let body = json!({ "refresh_token": "not.a.token" });
    let (status, response) = app.post(REFRESH, &body.to_string()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let response: Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_refresh_for_deactivated_user() {
    let app = common::TestApp::new();
    let (_, profile) = register(&app, "gone@example.com", "SecurePassword123!").await;
    let (_, tokens) = login(&app, "gone@example.com", "SecurePassword123!").await;

    let users = app.users.as_ref().unwrap();
    assert!(users.set_active(profile["id"].as_i64().unwrap(), false).await);

    let body = json!({ "refresh_token": tokens["refresh_token"] });
    let (status, _) = app.post(REFRESH, &body.to_string()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_full_flow_against_postgres() {
    let app = common::TestApp::with_database().await;
    app.cleanup().await;

    let email = format!("pg_{}@example.com", uuid::Uuid::new_v4().simple());
    let (status, profile) = register(&app, &email, "SecurePassword123!").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = register(&app, &email.to_uppercase(), "SecurePassword123!").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, tokens) = login(&app, &email, "SecurePassword123!").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .get_with_bearer(ME, tokens["access_token"].as_str().unwrap())
        .await;
    assert_eq!(status, StatusCode::OK);
    let me: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(me["id"], profile["id"]);

    app.cleanup().await;
}
