use axum::extract::State;
use axum::http::Uri;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::store::DepartmentStore as _;

pub mod auth;
pub mod departments;
pub mod employees;
pub mod users;

pub async fn welcome() -> ApiResult<Value> {
    Ok(ApiResponse::ok(
        "Welcome to HR management system: I will be responding to your requests",
        json!({ "version": env!("CARGO_PKG_VERSION") }),
    ))
}

pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    // A cheap read proves the store is actually reachable, not just configured.
    let database = match state.departments.list().await {
        Ok(_) => "up",
        Err(e) => {
            tracing::error!("health check store read failed: {}", e);
            "down"
        }
    };

    Ok(ApiResponse::ok(
        "ok",
        json!({
            "status": "ok",
            "timestamp": chrono::Utc::now(),
            "store": state.store_backend,
            "database": database,
        }),
    ))
}

/// Boundary handler for any request matching no route. Same envelope shape
/// as every other failure, naming the unmatched path.
pub async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::route_not_found(uri.path())
}
