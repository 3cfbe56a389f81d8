//! Generic route groups over the [`Repository`](crate::repositories::Repository).
//!
//! A resource is a marker type tying an [`Entity`] to its DTOs. The
//! handlers below are written once and instantiated per resource, so
//! every table gets the same list/detail/create/update/delete behaviour:
//!
//! ```ignore
//! Router::new()
//!     .nest("/api/users", read_routes::<Users>())
//!     .nest("/api/stars", crud_routes::<Stars>())
//! ```

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::api::middleware::{AuthUser, require_role};
use crate::error::AppResult;
use crate::models::ROLE_ADMIN;
use crate::repositories::{Entity, Includes};
use crate::state::AppState;
use crate::utils::ValidatedJson;

/// Read side of a resource: list rows as summaries, show one in detail.
pub trait Resource: Send + Sync + 'static {
    type Entity: Includes;
    type Summary: Serialize + From<Self::Entity> + Send + 'static;
    type Detail: Serialize + From<<Self::Entity as Includes>::Detailed> + Send + 'static;
}

/// Who may create, update and delete rows of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAccess {
    /// Catalog and reference data
    Admin,
    /// User-generated content
    Authenticated,
}

impl WriteAccess {
    pub fn check(self, user: &AuthUser) -> AppResult<()> {
        match self {
            WriteAccess::Admin => require_role(user, ROLE_ADMIN),
            WriteAccess::Authenticated => Ok(()),
        }
    }
}

pub type DraftOf<R> = <<R as Resource>::Entity as Entity>::Draft;

/// Write side of a resource: validated input mapped onto the entity draft.
pub trait CrudResource: Resource {
    type Input: DeserializeOwned + Validate + Send + 'static;

    const WRITE_ACCESS: WriteAccess;

    fn create_draft(input: Self::Input, actor: &AuthUser) -> DraftOf<Self>;

    /// Draft for overwriting `existing`. Columns the input does not carry
    /// (authorship) are taken from `existing`. Fails when `existing` may no
    /// longer be edited.
    fn update_draft(
        input: Self::Input,
        actor: &AuthUser,
        existing: &Self::Entity,
    ) -> AppResult<DraftOf<Self>>;
}

/// `GET /` and `GET /{id}`.
pub fn read_routes<R: Resource>() -> Router<AppState> {
    Router::new()
        .route("/", get(list::<R>))
        .route("/{id}", get(detail::<R>))
}

/// [`read_routes`] plus `POST /`, `PUT /{id}` and `DELETE /{id}`.
pub fn crud_routes<R: CrudResource>() -> Router<AppState> {
    Router::new()
        .route("/", get(list::<R>).post(create::<R>))
        .route(
            "/{id}",
            get(detail::<R>).put(update::<R>).delete(remove::<R>),
        )
}

async fn list<R: Resource>(State(state): State<AppState>) -> AppResult<Json<Vec<R::Summary>>> {
    let rows = state.repository::<R::Entity>().get_all().await?;
    Ok(Json(rows.into_iter().map(R::Summary::from).collect()))
}

async fn detail<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<R::Detail>> {
    let detailed = state.repository::<R::Entity>().get_detailed(id).await?;
    Ok(Json(R::Detail::from(detailed)))
}

async fn create<R: CrudResource>(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<R::Input>,
) -> AppResult<(StatusCode, Json<R::Summary>)> {
    R::WRITE_ACCESS.check(&user)?;

    let draft = R::create_draft(input, &user);
    let row = state.repository::<R::Entity>().add(&draft).await?;
    tracing::info!(
        entity = <R::Entity as Entity>::NAME,
        id = row.id(),
        user_id = user.user_id,
        "Row created"
    );

    Ok((StatusCode::CREATED, Json(R::Summary::from(row))))
}

async fn update<R: CrudResource>(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<R::Input>,
) -> AppResult<Json<R::Summary>> {
    R::WRITE_ACCESS.check(&user)?;

    let repository = state.repository::<R::Entity>();
    let existing = repository.get_by_id(id).await?;
    let draft = R::update_draft(input, &user, &existing)?;
    let row = repository.update(id, &draft).await?;
    tracing::info!(
        entity = <R::Entity as Entity>::NAME,
        id,
        user_id = user.user_id,
        "Row updated"
    );

    Ok(Json(R::Summary::from(row)))
}

async fn remove<R: CrudResource>(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthUser,
) -> AppResult<StatusCode> {
    R::WRITE_ACCESS.check(&user)?;

    state.repository::<R::Entity>().delete(id).await?;
    tracing::info!(
        entity = <R::Entity as Entity>::NAME,
        id,
        user_id = user.user_id,
        "Row deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Draft mapping for tables without authorship columns, where create and
/// update are the same conversion.
macro_rules! plain_crud_resource {
    ($resource:ty, $input:ty, $access:expr) => {
        impl $crate::api::resource::CrudResource for $resource {
            type Input = $input;

            const WRITE_ACCESS: $crate::api::resource::WriteAccess = $access;

            fn create_draft(
                input: Self::Input,
                _actor: &$crate::api::middleware::AuthUser,
            ) -> $crate::api::resource::DraftOf<Self> {
                input.into()
            }

            fn update_draft(
                input: Self::Input,
                _actor: &$crate::api::middleware::AuthUser,
                _existing: &<Self as $crate::api::resource::Resource>::Entity,
            ) -> $crate::error::AppResult<$crate::api::resource::DraftOf<Self>> {
                Ok(input.into())
            }
        }
    };
}

pub(crate) use plain_crud_resource;

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str) -> AuthUser {
        AuthUser {
            user_id: 5,
            email: "a@b.c".to_string(),
            username: "ab".to_string(),
            role: role.to_string(),
        }
    }

    #[test]
    fn admin_access_requires_admin_role() {
        assert!(WriteAccess::Admin.check(&user("admin")).is_ok());
        assert!(WriteAccess::Admin.check(&user("user")).is_err());
    }

    #[test]
    fn authenticated_access_accepts_any_role() {
        assert!(WriteAccess::Authenticated.check(&user("user")).is_ok());
        assert!(WriteAccess::Authenticated.check(&user("admin")).is_ok());
    }
}
