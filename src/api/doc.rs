use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub const AUTH_TAG: &str = "Auth";
pub const CATALOG_TAG: &str = "Catalog";
pub const CONTENT_TAG: &str = "Content";
pub const COMMUNITY_TAG: &str = "Community";
pub const MODERATION_TAG: &str = "Moderation";
pub const MEDIA_TAG: &str = "Media";
pub const ADMIN_TAG: &str = "Admin";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Astro",
        description = "Astronomy catalog, articles, events and discoveries",
    ),
    modifiers(&SecurityAddon),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::error::ValidationFieldError,
            crate::api::dto::CelestialBodyRequest,
            crate::api::dto::StarRequest,
            crate::api::dto::PlanetRequest,
            crate::api::dto::SatelliteRequest,
            crate::api::dto::AsteroidRequest,
            crate::api::dto::CometRequest,
            crate::api::dto::GalaxyQuasarRequest,
            crate::api::dto::GalaxyQuasarResponse,
            crate::api::dto::SatelliteResponse,
            crate::api::dto::CometResponse,
            crate::api::dto::ArticleRequest,
            crate::api::dto::CommentRequest,
            crate::api::dto::CommentResponse,
            crate::api::dto::ReportRequest,
            crate::api::dto::CityRequest,
            crate::api::dto::AddressRequest,
            crate::api::dto::AddressResponse,
            crate::api::dto::EventRequest,
            crate::api::dto::DiscoveryRequest,
            crate::storage::MediaCategory,
        )
    ),
    tags(
        (name = AUTH_TAG, description = "Login, registration and the current user"),
        (name = CATALOG_TAG, description = "Celestial bodies and their specialisations"),
        (name = CONTENT_TAG, description = "Articles, comments and reports"),
        (name = COMMUNITY_TAG, description = "Cities, events, discoveries and users"),
        (name = MODERATION_TAG, description = "Approval workflows (admin)"),
        (name = MEDIA_TAG, description = "Image upload"),
        (name = ADMIN_TAG, description = "Runtime administration"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer Token Authentication"))
                        .build(),
                ),
            )
        }
    }
}
