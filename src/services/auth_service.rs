//! Login, registration and token issuance.

use tracing::{info, warn};

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, ROLE_USER, User};
use crate::repositories::Repository;
use crate::utils::jwt::{Claims, generate_token};
use crate::utils::password::{hash_password, verify_password};

/// A freshly issued token with the user it was issued for.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub claims: Claims,
    pub user: User,
}

/// Account data accepted at registration; the password is still plaintext.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
    pub address_id: Option<i32>,
}

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Clone)]
pub struct AuthService {
    users: Repository<User>,
    jwt: JwtConfig,
}

impl AuthService {
    pub fn new(users: Repository<User>, jwt: JwtConfig) -> Self {
        Self { users, jwt }
    }

    /// Authenticates by email, username or phone plus password.
    ///
    /// Unknown identifiers and wrong passwords produce the same
    /// `Unauthorized` error.
    pub async fn login(&self, identifier: &str, password: &str) -> AppResult<AuthSession> {
        let Some(user) = self.users.find_by_identifier(identifier.trim()).await? else {
            warn!("Login failed: unknown identifier");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(password, &user.password_hash)? {
            warn!(user_id = user.id, "Login failed: wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        info!(user_id = user.id, "User logged in");
        self.issue(user)
    }

    /// Creates a `user`-role account and signs a token for it.
    ///
    /// # Errors
    /// `Duplicate` when the username, email or phone is taken
    pub async fn register(&self, registration: Registration) -> AppResult<AuthSession> {
        let draft = NewUser {
            username: registration.username,
            email: registration.email,
            phone: registration.phone,
            password_hash: hash_password(&registration.password)?,
            role: ROLE_USER.to_string(),
            address_id: registration.address_id,
        };

        let user = self.users.add(&draft).await?;
        info!(user_id = user.id, "User registered");
        self.issue(user)
    }

    /// The user behind an authenticated request.
    pub async fn me(&self, user_id: i32) -> AppResult<User> {
        self.users.get_by_id(user_id).await
    }

    fn issue(&self, user: User) -> AppResult<AuthSession> {
        let (token, claims) = generate_token(&user, &self.jwt)?;
        Ok(AuthSession {
            token,
            claims,
            user,
        })
    }
}
