use axum::extract::{Extension, Path, State};
use serde_json::Value;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;
use crate::store::{User, UserStore as _};

/// GET /users - list principals. Admins bound to a department see only that
/// department's users; superadmins (and department-less admins) see all.
/// The guard establishes the role; the department scoping happens here.
pub async fn list(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
) -> ApiResult<Vec<User>> {
    let scope = match (&actor.role[..], actor.department_id) {
        ("superadmin", _) => None,
        (_, Some(department_id)) => Some(department_id),
        (_, None) => None,
    };

    let users = state.users.list(scope).await?;
    Ok(ApiResponse::ok("User records", users))
}

/// GET /users/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<User> {
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::resource_not_found("User not found"))?;
    Ok(ApiResponse::ok("User record", user))
}

/// DELETE /users/:id - a missing user is a 404, never a silent success.
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Value> {
    state.users.delete(id).await?;
    Ok(ApiResponse::message_only("User deleted successfully"))
}
