// Shared harness: builds the full router against the in-memory store with a
// seeded admin/superadmin/employee trio, then drives it in-process.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use hrm_api::app::app;
use hrm_api::auth::{password, TokenService};
use hrm_api::blob::{BlobStore, LocalBlobStore};
use hrm_api::config::{AppConfig, Environment};
use hrm_api::state::AppState;
use hrm_api::store::{DepartmentStore, MemoryStore, NewUser, UserStore};

pub const ADMIN_EMAIL: &str = "admin@mail.com";
pub const SUPERADMIN_EMAIL: &str = "superadmin@mail.com";
pub const EMPLOYEE_EMAIL: &str = "employee1@mail.com";
pub const SEED_PASSWORD: &str = "123456";

/// The assembled router plus direct handles on the collaborators behind it,
/// for tests that need to manipulate sessions out-of-band.
pub struct TestHarness {
    pub app: Router,
    pub store: Arc<MemoryStore>,
    pub tokens: Arc<TokenService>,
}

pub async fn test_app() -> Router {
    harness().await.app
}

pub async fn harness() -> TestHarness {
    let store = Arc::new(MemoryStore::new());

    let operations = DepartmentStore::create(store.as_ref(), "Operations")
        .await
        .expect("seed department");

    let digest = password::hash(SEED_PASSWORD).expect("seed password hash");
    for (email, role, department_id) in [
        (ADMIN_EMAIL, "admin", Some(operations.id)),
        (SUPERADMIN_EMAIL, "superadmin", None),
        (EMPLOYEE_EMAIL, "employee1", None),
    ] {
        UserStore::create(
            store.as_ref(),
            NewUser {
                email: email.to_string(),
                password: digest.clone(),
                role: role.to_string(),
                department_id,
                employee_id: None,
            },
        )
        .await
        .expect("seed user");
    }

    let config = Arc::new(AppConfig {
        environment: Environment::Development,
        port: 0,
        token_secret: "integration-test-secret".to_string(),
        token_ttl: chrono::Duration::days(7),
        database_url: None,
        upload_dir: std::env::temp_dir().join(format!("hrm-test-{}", Uuid::new_v4())),
    });

    let blobs: Arc<dyn BlobStore> =
        Arc::new(LocalBlobStore::new(config.upload_dir.clone(), "/uploads"));

    let tokens = Arc::new(TokenService::new(&config.token_secret, config.token_ttl));

    let app = app(AppState {
        tokens: tokens.clone(),
        config,
        users: store.clone(),
        sessions: store.clone(),
        departments: store.clone(),
        employees: store.clone(),
        blobs,
        store_backend: "memory",
    });

    TestHarness { app, store, tokens }
}

/// Send a JSON request and decode the envelope.
pub async fn send(
    app: &Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    dispatch(app, request).await
}

pub async fn dispatch(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

/// Log in and return the issued bearer token.
pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["data"]["token"]
        .as_str()
        .expect("token in login response")
        .to_string()
}
