//! JWT authentication: the [`AuthUser`] extractor and role checks.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::utils::jwt::{Claims, validate_token};

/// Caller identity decoded from a valid bearer token.
///
/// Extract it in a handler to require authentication; a missing or invalid
/// token rejects with 401 before the handler runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub email: String,
    pub username: String,
    pub role: String,
}

impl TryFrom<Claims> for AuthUser {
    type Error = AppError;

    fn try_from(claims: Claims) -> AppResult<Self> {
        Ok(Self {
            user_id: claims.user_id()?,
            email: claims.email,
            username: claims.username,
            role: claims.role,
        })
    }
}

/// Fails with 403 unless the caller holds `role`.
pub fn require_role(user: &AuthUser, role: &str) -> AppResult<()> {
    if user.role == role {
        Ok(())
    } else {
        tracing::warn!(user_id = user.user_id, required = role, actual = %user.role, "Role check failed");
        Err(AppError::Forbidden {
            message: format!("This operation requires the '{role}' role"),
        })
    }
}

fn bearer_token(headers: &HeaderMap) -> AppResult<&str> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

    auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::unauthorized("Invalid authorization header format. Expected: Bearer <token>")
    })
}

fn authenticate(headers: &HeaderMap, secret: &str) -> AppResult<AuthUser> {
    let token = bearer_token(headers)?;
    AuthUser::try_from(validate_token(token, secret)?)
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> AppResult<Self> {
        let state = AppState::from_ref(state);
        authenticate(&parts.headers, &state.jwt_config.secret)
    }
}
