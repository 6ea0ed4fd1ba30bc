// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::store::StoreError;

/// Closed error taxonomy for the API. Every failure the pipeline can produce
/// is one of these variants; the `IntoResponse` impl below is the single place
/// where they are rendered to clients.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request (malformed input not caught by schema validation)
    BadRequest(String),

    // 401 Unauthorized (missing/invalid/expired credential or session)
    Unauthenticated(String),

    // 403 Forbidden (authenticated but insufficient role)
    Unauthorised(String),

    // 404 Not Found (entity or route absent)
    ResourceNotFound(String),

    // 409 Conflict (uniqueness violation)
    Conflict(String),

    // 410 Gone (time-bound resource past validity)
    Expired(String),

    // 422 Unprocessable Entity (schema validation failure, one entry per field)
    InvalidInput { errors: Vec<String> },

    // 500 Internal Server Error
    ServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Unauthenticated(_) => 401,
            ApiError::Unauthorised(_) => 403,
            ApiError::ResourceNotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::Expired(_) => 410,
            ApiError::InvalidInput { .. } => 422,
            ApiError::ServerError(_) => 500,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Unauthenticated(msg) => msg,
            ApiError::Unauthorised(msg) => msg,
            ApiError::ResourceNotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::Expired(msg) => msg,
            ApiError::InvalidInput { .. } => "Invalid input",
            ApiError::ServerError(msg) => msg,
        }
    }

    /// Convert to the uniform JSON error envelope.
    ///
    /// Quote characters are stripped from the message so the payload stays
    /// predictable for clients that string-match on it.
    pub fn to_json(&self) -> Value {
        let cleaned = self.message().replace('"', "");

        let mut body = json!({
            "success": false,
            "status": self.status_code(),
            "message": cleaned,
        });

        if let ApiError::InvalidInput { errors } = self {
            body["errors"] = Value::Array(
                errors
                    .iter()
                    .map(|msg| json!({ "message": msg }))
                    .collect(),
            );
        }

        body
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::Unauthenticated(message.into())
    }

    pub fn unauthorised(message: impl Into<String>) -> Self {
        ApiError::Unauthorised(message.into())
    }

    pub fn resource_not_found(message: impl Into<String>) -> Self {
        ApiError::ResourceNotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn expired(message: impl Into<String>) -> Self {
        ApiError::Expired(message.into())
    }

    pub fn invalid_input(errors: Vec<String>) -> Self {
        ApiError::InvalidInput { errors }
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        ApiError::ServerError(message.into())
    }

    /// Coercion target for unrecognized failures. Internal detail stays in
    /// the server logs, never in the response.
    pub fn unexpected() -> Self {
        ApiError::ServerError("An unexpected error occurred".to_string())
    }

    pub fn route_not_found(path: &str) -> Self {
        ApiError::ResourceNotFound(format!("Route not found: {}", path))
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => ApiError::resource_not_found(msg),
            StoreError::Conflict(msg) => ApiError::conflict(msg),
            StoreError::Backend(msg) => {
                // Don't expose storage internals to clients
                tracing::error!("store backend error: {}", msg);
                ApiError::unexpected()
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum. This is the error normalizer:
// the raw error is always logged server-side, with a second verbose line that
// the development-mode log filter makes visible.
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!(status = self.status_code(), "request failed: {}", self.message());
        tracing::debug!("request failed (detail): {:?}", self);

        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
