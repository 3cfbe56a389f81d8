//! Cities, addresses, events (with participants), discoveries and users.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::{COMMUNITY_TAG, MODERATION_TAG};
use crate::api::dto::{
    AddressDetailResponse, AddressRequest, AddressResponse, ApprovedDiscoveryResponse,
    CityDetailResponse, CityRequest, CityResponse, DiscoveryRequest, DiscoveryResponse,
    ErrorResponse, EventDetailResponse, EventRequest, EventResponse, ParticipantResponse,
    UserProfileResponse,
};
use crate::api::middleware::{AuthUser, require_role};
use crate::api::resource::{
    CrudResource, DraftOf, Resource, WriteAccess, crud_routes, plain_crud_resource, read_routes,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    Address, City, Discovery, Event, EventParticipant, NewDiscovery, ROLE_ADMIN, ReviewStatus,
    User,
};
use crate::repositories::JoinRepository;
use crate::repositories::search::{CitySearch, DiscoverySearch, EventSearch, UserSearch};
use crate::state::AppState;
use crate::utils::ValidatedQuery;

pub struct Cities;
pub struct Addresses;
pub struct Events;
pub struct Discoveries;
pub struct Users;

impl Resource for Cities {
    type Entity = City;
    type Summary = CityResponse;
    type Detail = CityDetailResponse;
}

impl Resource for Addresses {
    type Entity = Address;
    type Summary = AddressResponse;
    type Detail = AddressDetailResponse;
}

impl Resource for Events {
    type Entity = Event;
    type Summary = EventResponse;
    type Detail = EventDetailResponse;
}

impl Resource for Discoveries {
    type Entity = Discovery;
    type Summary = DiscoveryResponse;
    type Detail = DiscoveryResponse;
}

impl Resource for Users {
    type Entity = User;
    type Summary = UserProfileResponse;
    type Detail = UserProfileResponse;
}

plain_crud_resource!(Cities, CityRequest, WriteAccess::Admin);
// Members enter their own address when registering.
plain_crud_resource!(Addresses, AddressRequest, WriteAccess::Authenticated);
plain_crud_resource!(Events, EventRequest, WriteAccess::Admin);

impl CrudResource for Discoveries {
    type Input = DiscoveryRequest;

    const WRITE_ACCESS: WriteAccess = WriteAccess::Authenticated;

    fn create_draft(input: DiscoveryRequest, actor: &AuthUser) -> DraftOf<Self> {
        discovery_draft(input, actor.user_id)
    }

    /// Only pending discoveries are editable.
    fn update_draft(
        input: DiscoveryRequest,
        _actor: &AuthUser,
        existing: &Discovery,
    ) -> AppResult<DraftOf<Self>> {
        if existing.status != ReviewStatus::Pending.as_str() {
            return Err(AppError::unprocessable(format!(
                "discoveries {} is {}; only pending discoveries can be edited",
                existing.id, existing.status
            )));
        }
        Ok(discovery_draft(input, existing.discoverer_id))
    }
}

fn discovery_draft(input: DiscoveryRequest, discoverer_id: i32) -> NewDiscovery {
    NewDiscovery {
        discoverer_id,
        name: input.name,
        body_type: input.body_type,
        description: input.description,
        discovered_on: input.discovered_on,
    }
}

/// Generic groups, relative to `/api`. Users are read-only here; accounts
/// are created through `/api/auth/register`.
pub fn resource_routes() -> Router<AppState> {
    Router::new()
        .nest("/cities", crud_routes::<Cities>())
        .nest("/addresses", crud_routes::<Addresses>())
        .nest("/events", crud_routes::<Events>())
        .nest("/discoveries", crud_routes::<Discoveries>())
        .nest("/users", read_routes::<Users>())
}

/// Documented search, participation and moderation endpoints, relative
/// to `/api`.
pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(search_cities))
        .routes(routes!(search_events))
        .routes(routes!(search_discoveries))
        .routes(routes!(search_users))
        .routes(routes!(list_participants, join_event, leave_event))
        .routes(routes!(approve_discovery))
        .routes(routes!(reject_discovery))
}

/// GET /api/cities/search
#[utoipa::path(
    get,
    path = "/cities/search",
    tag = COMMUNITY_TAG,
    params(CitySearch),
    responses(
        (status = 200, description = "Exact name matches first, then alphabetical", body = Vec<CityResponse>),
        (status = 400, description = "Malformed query or invalid filter", body = ErrorResponse)
    )
)]
async fn search_cities(
    State(state): State<AppState>,
    ValidatedQuery(search): ValidatedQuery<CitySearch>,
) -> AppResult<Json<Vec<CityResponse>>> {
    let rows = state.repository::<City>().search(&search).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// GET /api/events/search
#[utoipa::path(
    get,
    path = "/events/search",
    tag = COMMUNITY_TAG,
    params(EventSearch),
    responses(
        (status = 200, description = "Events in start order", body = Vec<EventResponse>),
        (status = 400, description = "Malformed query or invalid filter", body = ErrorResponse)
    )
)]
async fn search_events(
    State(state): State<AppState>,
    ValidatedQuery(search): ValidatedQuery<EventSearch>,
) -> AppResult<Json<Vec<EventResponse>>> {
    let rows = state.repository::<Event>().search(&search).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// GET /api/discoveries/search
#[utoipa::path(
    get,
    path = "/discoveries/search",
    tag = COMMUNITY_TAG,
    params(DiscoverySearch),
    responses(
        (status = 200, description = "Matching discoveries", body = Vec<DiscoveryResponse>),
        (status = 400, description = "Malformed query or invalid filter", body = ErrorResponse)
    )
)]
async fn search_discoveries(
    State(state): State<AppState>,
    ValidatedQuery(search): ValidatedQuery<DiscoverySearch>,
) -> AppResult<Json<Vec<DiscoveryResponse>>> {
    let rows = state.repository::<Discovery>().search(&search).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// GET /api/users/search
#[utoipa::path(
    get,
    path = "/users/search",
    tag = COMMUNITY_TAG,
    params(UserSearch),
    responses(
        (status = 200, description = "Matching users ordered by username", body = Vec<UserProfileResponse>),
        (status = 400, description = "Malformed query or invalid filter", body = ErrorResponse)
    )
)]
async fn search_users(
    State(state): State<AppState>,
    ValidatedQuery(search): ValidatedQuery<UserSearch>,
) -> AppResult<Json<Vec<UserProfileResponse>>> {
    let rows = state.repository::<User>().search(&search).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// GET /api/events/{id}/participants
#[utoipa::path(
    get,
    path = "/events/{id}/participants",
    tag = COMMUNITY_TAG,
    params(("id" = i32, Path, description = "Event id")),
    responses(
        (status = 200, description = "User ids of the participants, in join order", body = Vec<i32>),
        (status = 404, description = "No such event", body = ErrorResponse)
    )
)]
async fn list_participants(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<i32>>> {
    state.repository::<Event>().get_by_id(id).await?;
    Ok(Json(participants(&state).member_ids(id).await?))
}

/// POST /api/events/{id}/participants
///
/// The caller joins the event.
#[utoipa::path(
    post,
    path = "/events/{id}/participants",
    tag = COMMUNITY_TAG,
    params(("id" = i32, Path, description = "Event id")),
    responses(
        (status = 201, description = "Joined", body = ParticipantResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "No such event", body = ErrorResponse),
        (status = 409, description = "Already participating", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn join_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<(StatusCode, Json<ParticipantResponse>)> {
    state.repository::<Event>().get_by_id(id).await?;
    let participant = participants(&state).add(id, user.user_id).await?;
    tracing::info!(event_id = id, user_id = user.user_id, "Joined event");
    Ok((StatusCode::CREATED, Json(participant.into())))
}

/// DELETE /api/events/{id}/participants
///
/// The caller leaves the event.
#[utoipa::path(
    delete,
    path = "/events/{id}/participants",
    tag = COMMUNITY_TAG,
    params(("id" = i32, Path, description = "Event id")),
    responses(
        (status = 204, description = "Left the event"),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Not participating", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn leave_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    participants(&state).remove(id, user.user_id).await?;
    tracing::info!(event_id = id, user_id = user.user_id, "Left event");
    Ok(StatusCode::NO_CONTENT)
}

fn participants(state: &AppState) -> JoinRepository<EventParticipant> {
    JoinRepository::new(state.db_pool.clone())
}

/// POST /api/discoveries/{id}/approve
///
/// Creates the catalog entry for a pending discovery and links it.
#[utoipa::path(
    post,
    path = "/discoveries/{id}/approve",
    tag = MODERATION_TAG,
    params(("id" = i32, Path, description = "Discovery id")),
    responses(
        (status = 200, description = "Discovery approved", body = ApprovedDiscoveryResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "No such discovery", body = ErrorResponse),
        (status = 422, description = "Discovery is not pending", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn approve_discovery(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApprovedDiscoveryResponse>> {
    require_role(&user, ROLE_ADMIN)?;
    let approved = state.services.approvals.approve_discovery(id).await?;
    Ok(Json(approved.into()))
}

/// POST /api/discoveries/{id}/reject
#[utoipa::path(
    post,
    path = "/discoveries/{id}/reject",
    tag = MODERATION_TAG,
    params(("id" = i32, Path, description = "Discovery id")),
    responses(
        (status = 200, description = "Discovery rejected", body = DiscoveryResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "No such discovery", body = ErrorResponse),
        (status = 422, description = "Discovery is not pending", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn reject_discovery(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<DiscoveryResponse>> {
    require_role(&user, ROLE_ADMIN)?;
    let discovery = state.services.approvals.reject_discovery(id).await?;
    Ok(Json(discovery.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn request() -> DiscoveryRequest {
        DiscoveryRequest {
            name: "C/2026 A1".to_string(),
            body_type: "comet".to_string(),
            description: "Faint coma near Lyra".to_string(),
            discovered_on: NaiveDate::from_ymd_opt(2026, 1, 4).unwrap(),
        }
    }

    fn editor() -> AuthUser {
        AuthUser {
            user_id: 99,
            email: "ed@example.org".to_string(),
            username: "ed".to_string(),
            role: "admin".to_string(),
        }
    }

    fn existing(status: &str) -> Discovery {
        Discovery {
            id: 1,
            discoverer_id: 12,
            name: "old".to_string(),
            body_type: "comet".to_string(),
            description: "old".to_string(),
            discovered_on: NaiveDate::from_ymd_opt(2026, 1, 3).unwrap(),
            status: status.to_string(),
            celestial_body_id: None,
        }
    }

    #[test]
    fn discovery_keeps_original_discoverer_on_edit() {
        let created = Discoveries::create_draft(request(), &editor());
        assert_eq!(created.discoverer_id, 99);

        let updated = Discoveries::update_draft(request(), &editor(), &existing("pending")).unwrap();
        assert_eq!(updated.discoverer_id, 12);
    }

    #[test]
    fn reviewed_discovery_cannot_be_edited() {
        for status in ["approved", "rejected"] {
            let result = Discoveries::update_draft(request(), &editor(), &existing(status));
            assert!(
                matches!(result, Err(AppError::UnprocessableContent { .. })),
                "{status}"
            );
        }
    }
}
