use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{password, TokenService};
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{NewUser, SessionStore, User, UserStore};

/// Registration, login and logout. Login is the only place sessions are
/// created; logout is the only place they are revoked.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(state: &AppState) -> Self {
        Self {
            users: state.users.clone(),
            sessions: state.sessions.clone(),
            tokens: state.tokens.clone(),
        }
    }

    /// Create a principal. Duplicate email is a conflict and creates nothing.
    pub async fn register(&self, email: String, plaintext: String) -> Result<User, ApiError> {
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(ApiError::conflict("User already exists"));
        }

        let digest = password::hash(&plaintext)?;
        let user = self
            .users
            .create(NewUser {
                email,
                password: digest,
                role: "employee".to_string(),
                department_id: None,
                employee_id: None,
            })
            .await?;
        Ok(user)
    }

    /// Verify credentials, issue a token and bind it to a fresh session.
    /// The upsert replaces any prior session for the principal, so an older
    /// login stops authenticating the moment this one succeeds.
    pub async fn login(&self, email: String, plaintext: String) -> Result<(String, User), ApiError> {
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| ApiError::resource_not_found("Authentication failed"))?;

        if !password::verify(&plaintext, &user.password) {
            return Err(ApiError::resource_not_found("Authentication failed"));
        }

        let token = self.tokens.issue(user.id)?;
        let expires_at = Utc::now() + self.tokens.ttl();
        self.sessions.upsert(user.id, &token, expires_at).await?;

        Ok((token, user))
    }

    /// Delete the session matching exactly this (principal, token) pair.
    /// The signed token stays structurally valid until its embedded expiry,
    /// but without a session row it no longer authenticates.
    pub async fn logout(&self, user_id: Uuid, token: &str) -> Result<(), ApiError> {
        self.sessions.delete(user_id, token).await?;
        Ok(())
    }
}
