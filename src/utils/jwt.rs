use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use crate::models::User;

/// JWT claims carried by every access token (HS256).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    pub username: String,
    /// `user` or `admin`
    pub role: String,
    /// Issued at (timestamp)
    pub iat: i64,
    /// Expiration time (timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for `user` valid for `expiration_hours`.
    pub fn for_user(user: &User, expiration_hours: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours);

        Self {
            sub: user.id.to_string(),
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// Numeric user id from `sub`.
    pub fn user_id(&self) -> AppResult<i32> {
        self.sub
            .parse()
            .map_err(|_| AppError::unauthorized("Token subject is not a user id"))
    }
}

/// Signs a token for `user` with the configured secret and lifetime.
///
/// # Returns
/// The encoded token and its claims
pub fn generate_token(user: &User, config: &JwtConfig) -> AppResult<(String, Claims)> {
    let claims = Claims::for_user(user, config.expiration_hours);

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Failed to generate JWT token: {}", e),
    })?;

    Ok((token, claims))
}

/// Validates signature and expiry and decodes the claims.
///
/// # Errors
/// `AppError::Unauthorized` for expired, malformed or foreign tokens
pub fn validate_token(token: &str, secret: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::unauthorized("Token has expired"),
        ErrorKind::InvalidToken => AppError::unauthorized("Invalid token"),
        ErrorKind::InvalidSignature => AppError::unauthorized("Invalid token signature"),
        _ => AppError::unauthorized(format!("Token validation failed: {}", e)),
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::models::ROLE_ADMIN;

    const TEST_SECRET: &str = "test_secret_key_for_jwt_testing_0123456789";

    fn config(expiration_hours: i64) -> JwtConfig {
        JwtConfig {
            secret: TEST_SECRET.to_string(),
            expiration_hours,
        }
    }

    fn user() -> User {
        User {
            id: 42,
            username: "vega".to_string(),
            email: "vega@example.com".to_string(),
            phone: None,
            password_hash: String::new(),
            role: ROLE_ADMIN.to_string(),
            address_id: None,
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_generate_and_validate_round_trip() {
        let (token, issued) = generate_token(&user(), &config(24)).unwrap();
        assert!(token.contains('.'));

        let claims = validate_token(&token, TEST_SECRET).unwrap();
        assert_eq!(claims, issued);
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "vega@example.com");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_validate_token_invalid_secret() {
        let (token, _) = generate_token(&user(), &config(1)).unwrap();

        match validate_token(&token, "another_secret_key_that_is_long_enough") {
            Err(AppError::Unauthorized { message }) => assert!(message.contains("signature")),
            other => panic!("Expected Unauthorized error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_token_invalid_format() {
        let result = validate_token("invalid.token.format", TEST_SECRET);
        assert!(matches!(result, Err(AppError::Unauthorized { .. })));
    }

    #[test]
    fn test_expired_token() {
        let (token, _) = generate_token(&user(), &config(-1)).unwrap();

        match validate_token(&token, TEST_SECRET) {
            Err(AppError::Unauthorized { message }) => assert!(message.contains("expired")),
            other => panic!("Expected Unauthorized error for expired token, got {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_subject_is_unauthorized() {
        let mut claims = Claims::for_user(&user(), 1);
        claims.sub = "abc".to_string();

        assert!(matches!(
            claims.user_id(),
            Err(AppError::Unauthorized { .. })
        ));
    }
}
