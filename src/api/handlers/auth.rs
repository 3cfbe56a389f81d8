//! Login, registration and the current user.

use axum::{Json, extract::State, http::StatusCode};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::AUTH_TAG;
use crate::api::dto::{AuthResponse, ErrorResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::api::middleware::AuthUser;
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::ValidatedJson;

/// Creates the authentication routes
///
/// # Routes
/// - `POST /login` - Exchange credentials for a token
/// - `POST /register` - Create an account and get a token
/// - `GET /me` - The account behind the bearer token
pub fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(login))
        .routes(routes!(register))
        .routes(routes!(me))
}

/// POST /api/auth/login
///
/// The identifier may be an email, a username or a phone number.
#[utoipa::path(
    post,
    path = "/login",
    tag = AUTH_TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    )
)]
async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let session = state
        .services
        .auth
        .login(&payload.identifier, &payload.password)
        .await?;
    Ok(Json(session.into()))
}

/// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/register",
    tag = AUTH_TAG,
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 409, description = "Username, email or phone already taken", body = ErrorResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    )
)]
async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let session = state.services.auth.register(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

/// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/me",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn me(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<UserResponse>> {
    let user = state.services.auth.me(user.user_id).await?;
    Ok(Json(user.into()))
}
