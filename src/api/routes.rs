//! Router configuration for the API.
//!
//! Documented endpoints are collected through `OpenApiRouter` and split
//! into a plain router plus the OpenAPI document; the generic CRUD groups
//! are merged in afterwards under the same `/api` prefix.

use axum::{Router, extract::DefaultBodyLimit, middleware};
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers::{admin, auth, catalog, community, content, health, media};
use crate::api::middleware::{global_error_handler, logging_middleware, request_id_middleware};
use crate::config::{Settings, StorageBackend};
use crate::state::AppState;

/// Room for multipart framing on top of the largest accepted file.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Last added runs first:
/// 1. Request ID middleware - generates/propagates `x-request-id`
/// 2. Logging middleware - request span and access log
/// 3. Error handler - stamps the request id on error bodies
///
/// # Routes
/// - `/health`, `/health/ready`, `/health/live`
/// - `/api/auth/*`, `/api/media/upload`, `/api/admin/log-level`
/// - `/api/<resource>` CRUD groups plus their search and workflow endpoints
/// - `/media/*` when files are stored locally
/// - `/swagger-ui` and `/api-docs/openapi.json` outside production
pub fn create_router(state: AppState, settings: &Settings) -> Router {
    let documented = OpenApiRouter::new()
        .nest("/auth", auth::auth_routes())
        .merge(catalog::routes())
        .merge(content::routes())
        .merge(community::routes())
        .merge(media::media_routes())
        .merge(admin::admin_routes());

    let (documented, openapi) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(health::health_routes())
        .nest("/api", documented)
        .split_for_parts();

    let resources = Router::new()
        .merge(catalog::resource_routes())
        .merge(content::resource_routes())
        .merge(community::resource_routes());

    let mut router = documented.nest("/api", resources);

    if settings.media.backend == StorageBackend::Local {
        router = router.nest_service("/media", ServeDir::new(&settings.media.local.root));
    }

    if settings.application.environment.exposes_api_docs() {
        router = router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));
    }

    router
        .layer(DefaultBodyLimit::max(
            settings.media.max_upload_bytes + MULTIPART_OVERHEAD,
        ))
        .layer(middleware::from_fn(global_error_handler))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
