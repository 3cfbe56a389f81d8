//! Authentication-related Data Transfer Objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::UserResponse;
use crate::services::{AuthSession, Registration};

/// Login request payload
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    /// Email, username or phone number
    #[validate(length(min = 1, max = 255, message = "Identifier cannot be empty"))]
    #[schema(example = "vera@rubin.org")]
    pub identifier: String,
    #[validate(length(min = 1, max = 128, message = "Password cannot be empty"))]
    #[schema(example = "dark-matter-42", format = "password")]
    pub password: String,
}

/// Register request payload
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    #[schema(example = "vera", min_length = 3, max_length = 50)]
    pub username: String,
    #[validate(email(message = "Invalid email format"), length(max = 255))]
    #[schema(example = "vera@rubin.org", format = "email")]
    pub email: String,
    #[validate(length(min = 5, max = 20, message = "Phone must be between 5 and 20 characters"))]
    pub phone: Option<String>,
    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    #[schema(example = "dark-matter-42", format = "password", min_length = 8, max_length = 128)]
    pub password: String,
    pub address_id: Option<i32>,
}

impl From<RegisterRequest> for Registration {
    fn from(request: RegisterRequest) -> Self {
        Self {
            username: request.username,
            email: request.email,
            phone: request.phone,
            password: request.password,
            address_id: request.address_id,
        }
    }
}

/// Issued token with the account it belongs to
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            token: session.token,
            token_type: "Bearer".to_string(),
            expires_at: DateTime::from_timestamp(session.claims.exp, 0).unwrap_or_default(),
            user: session.user.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_validation() {
        let request = RegisterRequest {
            username: "ve".to_string(),
            email: "not-an-email".to_string(),
            phone: None,
            password: "short".to_string(),
            address_id: None,
        };

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(!fields.contains_key("phone"));
    }

    #[test]
    fn login_request_uses_identifier() {
        let request: LoginRequest =
            serde_json::from_str(r#"{"identifier":"vera","password":"dark-matter-42"}"#).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.identifier, "vera");
    }
}
