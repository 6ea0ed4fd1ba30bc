use axum::extract::{Extension, State};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::middleware::{ApiResponse, ApiResult, BearerToken, CurrentUser};
use crate::services::AuthService;
use crate::state::AppState;
use crate::validation::ValidatedJson;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(required(message = "required"), email(message = "not a valid email"))]
    pub email: Option<String>,
    #[validate(
        required(message = "required"),
        length(min = 6, message = "too short, expected at least 6 characters")
    )]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(required(message = "required"), email(message = "not a valid email"))]
    pub email: Option<String>,
    #[validate(
        required(message = "required"),
        length(min = 6, message = "too short, expected at least 6 characters")
    )]
    pub password: Option<String>,
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> ApiResult<Value> {
    let user = AuthService::new(&state)
        .register(
            payload.email.unwrap_or_default(),
            payload.password.unwrap_or_default(),
        )
        .await?;

    Ok(ApiResponse::created(
        "User Created Successfully.",
        serde_json::to_value(&user).unwrap_or(Value::Null),
    ))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> ApiResult<Value> {
    let (token, user) = AuthService::new(&state)
        .login(
            payload.email.unwrap_or_default(),
            payload.password.unwrap_or_default(),
        )
        .await?;

    Ok(ApiResponse::ok(
        "Login Successfully",
        json!({
            "token": token,
            "user": {
                "email": user.email,
                "role": user.role,
            },
        }),
    ))
}

/// POST /auth/logout - revokes the presented token's session.
pub async fn logout(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(BearerToken(token)): Extension<BearerToken>,
) -> ApiResult<Value> {
    AuthService::new(&state).logout(user.id, &token).await?;
    Ok(ApiResponse::message_only("Logout successful"))
}
