use axum::extract::State;
use serde::Deserialize;
use validator::Validate;

use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::store::{Department, DepartmentStore as _};
use crate::validation::ValidatedJson;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDepartmentRequest {
    #[validate(
        required(message = "required"),
        length(min = 3, message = "too short, expected at least 3 characters")
    )]
    pub name: Option<String>,
}

/// POST /departments
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateDepartmentRequest>,
) -> ApiResult<Department> {
    let department = state
        .departments
        .create(&payload.name.unwrap_or_default())
        .await?;
    Ok(ApiResponse::created("Department created", department))
}

/// GET /departments
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Department>> {
    let departments = state.departments.list().await?;
    Ok(ApiResponse::ok("Department records", departments))
}
