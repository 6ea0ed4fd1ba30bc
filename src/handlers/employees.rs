use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::blob::{BlobMetadata, BlobStore as _};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::EmployeeService;
use crate::state::AppState;
use crate::store::{EmployeePatch, EmployeeStore as _, NewEmployee};
use crate::validation::{ValidatedJson, ValidatedQuery};

fn validate_role(role: &str) -> Result<(), ValidationError> {
    match role {
        "employee" | "admin" => Ok(()),
        _ => Err(ValidationError::new("role")),
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddEmployeeRequest {
    #[validate(required(message = "required"), email(message = "not a valid email"))]
    pub email: Option<String>,
    #[validate(required(message = "required"))]
    pub name: Option<String>,
    #[validate(required(message = "required"))]
    pub department: Option<String>,
    #[validate(custom(function = validate_role, message = "not a valid role"))]
    pub role: Option<String>,
    #[validate(
        required(message = "required"),
        range(min = 0.01, message = "must be a positive number")
    )]
    pub salary: Option<f64>,
    /// Date-like strings are coerced on the way in
    #[validate(required(message = "required"))]
    pub joining_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    #[validate(email(message = "not a valid email"))]
    pub email: Option<String>,
    pub name: Option<String>,
    pub department: Option<String>,
    #[validate(custom(function = validate_role, message = "not a valid role"))]
    pub role: Option<String>,
    #[validate(range(min = 0.01, message = "must be a positive number"))]
    pub salary: Option<f64>,
    pub joining_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ListQuery {
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "must be between 1 and 100"))]
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UploadQuery {
    #[validate(required(message = "required"))]
    pub filename: Option<String>,
}

/// POST /employees - onboard an employee and provision their login account.
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AddEmployeeRequest>,
) -> ApiResult<Value> {
    let role = payload.role.unwrap_or_else(|| "employee".to_string());
    let data = NewEmployee {
        name: payload.name.unwrap_or_default(),
        email: payload.email.unwrap_or_default(),
        department: payload.department.unwrap_or_default(),
        salary: payload.salary.unwrap_or_default(),
        joining_date: payload.joining_date.unwrap_or_default(),
    };

    let (employee, user) = EmployeeService::new(&state).add(data, role).await?;

    Ok(ApiResponse::created(
        "Employee added successfully",
        json!({ "employee": employee, "user": user }),
    ))
}

/// GET /employees?page=N&limit=M
pub async fn list(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListQuery>,
) -> ApiResult<Value> {
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(10);

    let result = EmployeeService::new(&state).list(page, limit).await?;
    let message = if result.employees.is_empty() {
        "No employee has been added"
    } else {
        "Employee records"
    };

    Ok(ApiResponse::ok(
        message,
        json!({
            "employees": result.employees,
            "totalPages": result.total_pages,
        }),
    ))
}

/// PATCH /employees/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateEmployeeRequest>,
) -> ApiResult<Value> {
    let patch = EmployeePatch {
        name: payload.name,
        email: payload.email,
        department: payload.department,
        salary: payload.salary,
        joining_date: payload.joining_date,
    };

    EmployeeService::new(&state)
        .update(id, patch, payload.role)
        .await?;

    Ok(ApiResponse::message_only("Record updated successfully"))
}

/// DELETE /employees/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Value> {
    EmployeeService::new(&state).delete(id).await?;
    Ok(ApiResponse::message_only("Employee deleted successfully"))
}

/// POST /employees/:id/documents?filename=... - store a compliance document
/// through the blob-store collaborator and return its URL.
pub async fn upload_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedQuery(query): ValidatedQuery<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Value> {
    state
        .employees
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::resource_not_found("Employee not found"))?;

    if body.is_empty() {
        return Err(ApiError::bad_request("Empty document body"));
    }

    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let url = state
        .blobs
        .store(
            body.to_vec(),
            BlobMetadata {
                filename: query.filename.unwrap_or_default(),
                content_type,
            },
        )
        .await?;

    Ok(ApiResponse::created(
        "Document uploaded",
        json!({ "url": url }),
    ))
}
