use axum::{extract::Request, middleware::Next, response::Response};

use super::auth::CurrentUser;
use crate::error::ApiError;

/// Role guard, composed after [`super::auth::authenticate`]. Permits the
/// request only if the attached principal's role is in the allow-set.
/// Single-shot synchronous check; the handler is never invoked on failure.
pub async fn require_role(
    allowed: &'static [&'static str],
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| ApiError::unauthenticated("User not found in request"))?;

    if !allowed.contains(&user.0.role.as_str()) {
        return Err(ApiError::unauthorised("Access Denied: Unauthorized Role"));
    }

    Ok(next.run(request).await)
}

/// Department-scoped variant. The role check is identical; scoping data
/// access to the principal's department is done by the handlers themselves,
/// which read `CurrentUser`'s `department_id` and filter explicitly.
pub async fn require_department_role(
    allowed: &'static [&'static str],
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    require_role(allowed, request, next).await
}
