//! User-related DTOs for API responses.

use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::User;

/// The caller's own account; the password hash never leaves the server.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    /// `user` or `admin`
    pub role: String,
    pub address_id: Option<i32>,
    pub created_at: NaiveDateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            phone: user.phone,
            role: user.role,
            address_id: user.address_id,
            created_at: user.created_at,
        }
    }
}

/// Another member as anyone may see them: no contact details.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserProfileResponse {
    pub id: i32,
    pub username: String,
    pub role: String,
    pub created_at: NaiveDateTime,
}

impl From<User> for UserProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            created_at: user.created_at,
        }
    }
}
