//! Runtime administration: the active log filter.

use anyhow::anyhow;
use axum::{Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::ADMIN_TAG;
use crate::api::dto::{ErrorResponse, LogLevelRequest, LogLevelResponse};
use crate::api::middleware::{AuthUser, require_role};
use crate::error::{AppError, AppResult};
use crate::logger::LogLevelHandle;
use crate::models::ROLE_ADMIN;
use crate::state::AppState;
use crate::utils::ValidatedJson;

pub fn admin_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(get_log_level, set_log_level))
}

/// GET /api/admin/log-level
#[utoipa::path(
    get,
    path = "/admin/log-level",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "Active filter", body = LogLevelResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn get_log_level(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<LogLevelResponse>> {
    require_role(&user, ROLE_ADMIN)?;
    let level = handle(&state)?
        .current_level()
        .ok_or_else(|| AppError::from(anyhow!("log filter is no longer reloadable")))?;
    Ok(Json(LogLevelResponse { level }))
}

/// PUT /api/admin/log-level
#[utoipa::path(
    put,
    path = "/admin/log-level",
    tag = ADMIN_TAG,
    request_body = LogLevelRequest,
    responses(
        (status = 200, description = "Filter replaced", body = LogLevelResponse),
        (status = 400, description = "Unparseable level", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn set_log_level(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<LogLevelRequest>,
) -> AppResult<Json<LogLevelResponse>> {
    require_role(&user, ROLE_ADMIN)?;
    handle(&state)?
        .set_level(&payload.level)
        .map_err(|e| AppError::bad_request(e.to_string()))?;
    tracing::info!(user_id = user.user_id, level = %payload.level, "Log level updated");
    Ok(Json(LogLevelResponse {
        level: payload.level,
    }))
}

fn handle(state: &AppState) -> AppResult<&LogLevelHandle> {
    state
        .log_level
        .as_ref()
        .ok_or_else(|| AppError::from(anyhow!("logger was not initialised with a reload handle")))
}
