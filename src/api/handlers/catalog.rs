//! Catalog resources and their search endpoints.
//!
//! Every catalog table is admin-writable and publicly readable through the
//! generic route groups; the four searchable tables add `GET /search`.

use axum::{
    Json, Router,
    extract::State,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::CATALOG_TAG;
use crate::api::dto::{
    AsteroidRequest, AsteroidResponse, CelestialBodyRequest, CelestialBodyResponse, CometRequest,
    CometResponse, ErrorResponse, GalaxyQuasarRequest, GalaxyQuasarResponse, PlanetDetailResponse,
    PlanetRequest, PlanetResponse, SatelliteRequest, SatelliteResponse, StarDetailResponse,
    StarRequest, StarResponse, WithBodyResponse,
};
use crate::api::resource::{Resource, WriteAccess, crud_routes, plain_crud_resource};
use crate::error::AppResult;
use crate::models::{Asteroid, CelestialBody, Comet, GalaxyQuasar, Planet, Satellite, Star};
use crate::repositories::search::{AsteroidSearch, CelestialBodySearch, PlanetSearch, StarSearch};
use crate::state::AppState;
use crate::utils::ValidatedQuery;

pub struct CelestialBodies;
pub struct Stars;
pub struct Planets;
pub struct Satellites;
pub struct Asteroids;
pub struct Comets;
pub struct GalaxiesQuasars;

impl Resource for CelestialBodies {
    type Entity = CelestialBody;
    type Summary = CelestialBodyResponse;
    type Detail = CelestialBodyResponse;
}

impl Resource for Stars {
    type Entity = Star;
    type Summary = StarResponse;
    type Detail = StarDetailResponse;
}

impl Resource for Planets {
    type Entity = Planet;
    type Summary = PlanetResponse;
    type Detail = PlanetDetailResponse;
}

impl Resource for Satellites {
    type Entity = Satellite;
    type Summary = SatelliteResponse;
    type Detail = WithBodyResponse<SatelliteResponse>;
}

impl Resource for Asteroids {
    type Entity = Asteroid;
    type Summary = AsteroidResponse;
    type Detail = WithBodyResponse<AsteroidResponse>;
}

impl Resource for Comets {
    type Entity = Comet;
    type Summary = CometResponse;
    type Detail = WithBodyResponse<CometResponse>;
}

impl Resource for GalaxiesQuasars {
    type Entity = GalaxyQuasar;
    type Summary = GalaxyQuasarResponse;
    type Detail = WithBodyResponse<GalaxyQuasarResponse>;
}

plain_crud_resource!(CelestialBodies, CelestialBodyRequest, WriteAccess::Admin);
plain_crud_resource!(Stars, StarRequest, WriteAccess::Admin);
plain_crud_resource!(Planets, PlanetRequest, WriteAccess::Admin);
plain_crud_resource!(Satellites, SatelliteRequest, WriteAccess::Admin);
plain_crud_resource!(Asteroids, AsteroidRequest, WriteAccess::Admin);
plain_crud_resource!(Comets, CometRequest, WriteAccess::Admin);
plain_crud_resource!(GalaxiesQuasars, GalaxyQuasarRequest, WriteAccess::Admin);

/// Generic CRUD groups, relative to `/api`.
pub fn resource_routes() -> Router<AppState> {
    Router::new()
        .nest("/celestial-bodies", crud_routes::<CelestialBodies>())
        .nest("/stars", crud_routes::<Stars>())
        .nest("/planets", crud_routes::<Planets>())
        .nest("/satellites", crud_routes::<Satellites>())
        .nest("/asteroids", crud_routes::<Asteroids>())
        .nest("/comets", crud_routes::<Comets>())
        .nest("/galaxies-quasars", crud_routes::<GalaxiesQuasars>())
}

/// Documented search endpoints, relative to `/api`.
pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(search_celestial_bodies))
        .routes(routes!(search_stars))
        .routes(routes!(search_planets))
        .routes(routes!(search_asteroids))
}

/// GET /api/celestial-bodies/search
#[utoipa::path(
    get,
    path = "/celestial-bodies/search",
    tag = CATALOG_TAG,
    params(CelestialBodySearch),
    responses(
        (status = 200, description = "Matching bodies ordered by name", body = Vec<CelestialBodyResponse>),
        (status = 400, description = "Malformed query or invalid filter", body = ErrorResponse)
    )
)]
async fn search_celestial_bodies(
    State(state): State<AppState>,
    ValidatedQuery(search): ValidatedQuery<CelestialBodySearch>,
) -> AppResult<Json<Vec<CelestialBodyResponse>>> {
    let rows = state.repository::<CelestialBody>().search(&search).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// GET /api/stars/search
#[utoipa::path(
    get,
    path = "/stars/search",
    tag = CATALOG_TAG,
    params(StarSearch),
    responses(
        (status = 200, description = "Matching stars", body = Vec<StarResponse>),
        (status = 400, description = "Malformed query or invalid filter", body = ErrorResponse)
    )
)]
async fn search_stars(
    State(state): State<AppState>,
    ValidatedQuery(search): ValidatedQuery<StarSearch>,
) -> AppResult<Json<Vec<StarResponse>>> {
    let rows = state.repository::<Star>().search(&search).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// GET /api/planets/search
#[utoipa::path(
    get,
    path = "/planets/search",
    tag = CATALOG_TAG,
    params(PlanetSearch),
    responses(
        (status = 200, description = "Matching planets", body = Vec<PlanetResponse>),
        (status = 400, description = "Malformed query or invalid filter", body = ErrorResponse)
    )
)]
async fn search_planets(
    State(state): State<AppState>,
    ValidatedQuery(search): ValidatedQuery<PlanetSearch>,
) -> AppResult<Json<Vec<PlanetResponse>>> {
    let rows = state.repository::<Planet>().search(&search).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// GET /api/asteroids/search
#[utoipa::path(
    get,
    path = "/asteroids/search",
    tag = CATALOG_TAG,
    params(AsteroidSearch),
    responses(
        (status = 200, description = "Matching asteroids", body = Vec<AsteroidResponse>),
        (status = 400, description = "Malformed query or invalid filter", body = ErrorResponse)
    )
)]
async fn search_asteroids(
    State(state): State<AppState>,
    ValidatedQuery(search): ValidatedQuery<AsteroidSearch>,
) -> AppResult<Json<Vec<AsteroidResponse>>> {
    let rows = state.repository::<Asteroid>().search(&search).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}
