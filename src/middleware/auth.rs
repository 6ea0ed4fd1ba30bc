use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{SessionStore as _, StoreError, User, UserStore as _};

/// Authenticated principal, attached to the request by [`authenticate`].
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// The raw bearer token the request presented, kept around so logout can
/// revoke exactly the session it belongs to.
#[derive(Clone, Debug)]
pub struct BearerToken(pub String);

/// Authentication middleware. Verifies the bearer token's signature and
/// embedded expiry, then cross-checks the server-side session row: the
/// session is the revocation authority, so a logged-out token is rejected
/// even while its signature would still verify. On success the loaded
/// principal is attached to the request. Read-only; never mutates sessions.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers())
        .ok_or_else(|| ApiError::unauthenticated("Invalid token"))?;

    let subject = state.tokens.verify(&token)?;

    let session = state
        .sessions
        .find_by_token(&token)
        .await
        .map_err(internal)?;
    let session_valid = session
        .map(|s| s.user_id == subject && Utc::now() < s.expires_at)
        .unwrap_or(false);
    if !session_valid {
        return Err(ApiError::unauthenticated("Session expired or invalid"));
    }

    let user = state
        .users
        .find_by_id(subject)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::unauthenticated("Invalid token"))?;

    request.extensions_mut().insert(BearerToken(token));
    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}

/// Pull the token out of `Authorization: Bearer <token>`. Absent header,
/// wrong scheme or an empty token all reject before any decoding happens.
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("authorization")?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

fn internal(err: StoreError) -> ApiError {
    tracing::error!("authentication pipeline store failure: {}", err);
    ApiError::server_error("INTERNAL_SERVER_ERROR")
}
