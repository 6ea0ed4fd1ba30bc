mod common;

use axum::http::{Method, StatusCode};
use chrono::Utc;
use serde_json::json;

use common::{login, send, ADMIN_EMAIL, EMPLOYEE_EMAIL, SEED_PASSWORD};
use hrm_api::store::{SessionStore, UserStore};

#[tokio::test]
async fn seeded_admin_can_login_and_call_protected_route() {
    let app = common::test_app().await;

    let token = login(&app, ADMIN_EMAIL, SEED_PASSWORD).await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/departments",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "Operations");
}

#[tokio::test]
async fn login_response_carries_user_summary() {
    let app = common::test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": ADMIN_EMAIL, "password": SEED_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login Successfully");
    assert_eq!(body["data"]["user"]["email"], ADMIN_EMAIL);
    assert_eq!(body["data"]["user"]["role"], "admin");
}

#[tokio::test]
async fn logout_revokes_token_before_its_signed_expiry() {
    let app = common::test_app().await;
    let token = login(&app, ADMIN_EMAIL, SEED_PASSWORD).await;

    // Token works...
    let (status, _) = send(&app, Method::GET, "/api/v1/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/auth/logout",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // ...but not after logout, even though its signature is still valid.
    let (status, body) = send(&app, Method::GET, "/api/v1/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Session expired or invalid");
}

#[tokio::test]
async fn second_login_invalidates_the_first_session() {
    let app = common::test_app().await;

    let first = login(&app, ADMIN_EMAIL, SEED_PASSWORD).await;
    let second = login(&app, ADMIN_EMAIL, SEED_PASSWORD).await;
    assert_ne!(first, second);

    let (status, body) = send(&app, Method::GET, "/api/v1/users", Some(&first), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Session expired or invalid");

    let (status, _) = send(&app, Method::GET, "/api/v1/users", Some(&second), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn expired_session_row_is_rejected_despite_valid_token() {
    // Session expiry is validated independently of the token's embedded
    // expiry: here the token is still good but the session row is stale.
    let harness = common::harness().await;
    let admin = UserStore::find_by_email(harness.store.as_ref(), ADMIN_EMAIL)
        .await
        .unwrap()
        .unwrap();

    let token = harness.tokens.issue(admin.id).unwrap();
    harness
        .store
        .upsert(admin.id, &token, Utc::now() - chrono::Duration::hours(1))
        .await
        .unwrap();

    let (status, body) = send(
        &harness.app,
        Method::GET,
        "/api/v1/users",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Session expired or invalid");
}

#[tokio::test]
async fn valid_token_without_session_row_is_rejected() {
    // A structurally valid, unexpired token alone is not enough: the session
    // row is the source of truth for "is this token still usable".
    let harness = common::harness().await;
    let admin = UserStore::find_by_email(harness.store.as_ref(), ADMIN_EMAIL)
        .await
        .unwrap()
        .unwrap();

    let token = harness.tokens.issue(admin.id).unwrap();

    let (status, body) = send(
        &harness.app,
        Method::GET,
        "/api/v1/users",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Session expired or invalid");
}

#[tokio::test]
async fn missing_authorization_header_is_rejected() {
    let app = common::test_app().await;
    let (status, body) = send(&app, Method::GET, "/api/v1/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn non_bearer_scheme_is_rejected() {
    let app = common::test_app().await;

    let request = axum::http::Request::builder()
        .method(Method::GET)
        .uri("/api/v1/users")
        .header("authorization", "Basic dXNlcjpwYXNz")
        .body(axum::body::Body::empty())
        .unwrap();
    let (status, body) = common::dispatch(&app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let app = common::test_app().await;
    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/users",
        Some("not.a.token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn wrong_password_fails_authentication() {
    let app = common::test_app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": ADMIN_EMAIL, "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Authentication failed");
}

#[tokio::test]
async fn register_then_login_then_logout() {
    let app = common::test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({ "email": "new.hire@mail.com", "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User Created Successfully.");
    // The password digest is never echoed back
    assert!(body["data"].get("password").is_none());

    let token = login(&app, "new.hire@mail.com", "secret123").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/auth/logout",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn duplicate_registration_creates_nothing() {
    let app = common::test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({ "email": ADMIN_EMAIL, "password": "different-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "User already exists");

    // The existing principal is untouched: its password still works and the
    // attempted one does not.
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": ADMIN_EMAIL, "password": "different-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    login(&app, ADMIN_EMAIL, SEED_PASSWORD).await;
}

#[tokio::test]
async fn any_authenticated_role_can_logout() {
    let app = common::test_app().await;
    let token = login(&app, EMPLOYEE_EMAIL, SEED_PASSWORD).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/auth/logout",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
