//! Articles, comments and reports, with their moderation endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::{CONTENT_TAG, MODERATION_TAG};
use crate::api::dto::{
    ArticleDetailResponse, ArticleRequest, ArticleResponse, CommentRequest, CommentResponse,
    ErrorResponse, ReportRequest, ReportResponse,
};
use crate::api::middleware::{AuthUser, require_role};
use crate::api::resource::{CrudResource, DraftOf, Resource, WriteAccess, crud_routes};
use crate::error::AppResult;
use crate::models::{
    Article, Comment, NewArticle, NewComment, NewReport, ROLE_ADMIN, Report, ReviewStatus,
};
use crate::repositories::search::{ArticleSearch, ReportSearch};
use crate::state::AppState;
use crate::utils::ValidatedQuery;

pub struct Articles;
pub struct Comments;
pub struct Reports;

impl Resource for Articles {
    type Entity = Article;
    type Summary = ArticleResponse;
    type Detail = ArticleDetailResponse;
}

impl CrudResource for Articles {
    type Input = ArticleRequest;

    const WRITE_ACCESS: WriteAccess = WriteAccess::Authenticated;

    fn create_draft(input: ArticleRequest, actor: &AuthUser) -> DraftOf<Self> {
        article_draft(input, actor.user_id)
    }

    /// Edited text goes back through moderation, even when already published.
    fn update_draft(
        input: ArticleRequest,
        _actor: &AuthUser,
        existing: &Article,
    ) -> AppResult<DraftOf<Self>> {
        Ok(article_draft(input, existing.author_id))
    }
}

fn article_draft(input: ArticleRequest, author_id: i32) -> NewArticle {
    NewArticle {
        author_id,
        celestial_body_id: input.celestial_body_id,
        title: input.title,
        content: input.content,
        status: ReviewStatus::Pending.as_str().to_string(),
        published_at: None,
    }
}

impl Resource for Comments {
    type Entity = Comment;
    type Summary = CommentResponse;
    type Detail = CommentResponse;
}

impl CrudResource for Comments {
    type Input = CommentRequest;

    const WRITE_ACCESS: WriteAccess = WriteAccess::Authenticated;

    fn create_draft(input: CommentRequest, actor: &AuthUser) -> DraftOf<Self> {
        NewComment {
            article_id: input.article_id,
            author_id: actor.user_id,
            content: input.content,
        }
    }

    fn update_draft(
        input: CommentRequest,
        _actor: &AuthUser,
        existing: &Comment,
    ) -> AppResult<DraftOf<Self>> {
        Ok(NewComment {
            article_id: input.article_id,
            author_id: existing.author_id,
            content: input.content,
        })
    }
}

impl Resource for Reports {
    type Entity = Report;
    type Summary = ReportResponse;
    type Detail = ReportResponse;
}

impl CrudResource for Reports {
    type Input = ReportRequest;

    const WRITE_ACCESS: WriteAccess = WriteAccess::Authenticated;

    fn create_draft(input: ReportRequest, actor: &AuthUser) -> DraftOf<Self> {
        report_draft(input, actor.user_id)
    }

    fn update_draft(
        input: ReportRequest,
        _actor: &AuthUser,
        existing: &Report,
    ) -> AppResult<DraftOf<Self>> {
        Ok(report_draft(input, existing.reporter_id))
    }
}

fn report_draft(input: ReportRequest, reporter_id: i32) -> NewReport {
    NewReport {
        reporter_id,
        article_id: input.article_id,
        comment_id: input.comment_id,
        reason: input.reason,
    }
}

/// Generic CRUD groups, relative to `/api`.
pub fn resource_routes() -> Router<AppState> {
    Router::new()
        .nest("/articles", crud_routes::<Articles>())
        .nest("/comments", crud_routes::<Comments>())
        .nest("/reports", crud_routes::<Reports>())
}

/// Documented search and moderation endpoints, relative to `/api`.
pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(search_articles))
        .routes(routes!(search_reports))
        .routes(routes!(approve_article))
        .routes(routes!(reject_article))
        .routes(routes!(resolve_report))
        .routes(routes!(dismiss_report))
}

/// GET /api/articles/search
#[utoipa::path(
    get,
    path = "/articles/search",
    tag = CONTENT_TAG,
    params(ArticleSearch),
    responses(
        (status = 200, description = "Matching articles, newest first", body = Vec<ArticleResponse>),
        (status = 400, description = "Malformed query or invalid filter", body = ErrorResponse)
    )
)]
async fn search_articles(
    State(state): State<AppState>,
    ValidatedQuery(search): ValidatedQuery<ArticleSearch>,
) -> AppResult<Json<Vec<ArticleResponse>>> {
    let rows = state.repository::<Article>().search(&search).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// GET /api/reports/search
#[utoipa::path(
    get,
    path = "/reports/search",
    tag = CONTENT_TAG,
    params(ReportSearch),
    responses(
        (status = 200, description = "Matching reports, newest first", body = Vec<ReportResponse>),
        (status = 400, description = "Malformed query or invalid filter", body = ErrorResponse)
    )
)]
async fn search_reports(
    State(state): State<AppState>,
    ValidatedQuery(search): ValidatedQuery<ReportSearch>,
) -> AppResult<Json<Vec<ReportResponse>>> {
    let rows = state.repository::<Report>().search(&search).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// POST /api/articles/{id}/approve
///
/// Publishes a pending article and stamps `published_at`.
#[utoipa::path(
    post,
    path = "/articles/{id}/approve",
    tag = MODERATION_TAG,
    params(("id" = i32, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article approved", body = ArticleResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "No such article", body = ErrorResponse),
        (status = 422, description = "Article is not pending", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn approve_article(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ArticleResponse>> {
    require_role(&user, ROLE_ADMIN)?;
    let article = state.services.approvals.approve_article(id).await?;
    Ok(Json(article.into()))
}

/// POST /api/articles/{id}/reject
#[utoipa::path(
    post,
    path = "/articles/{id}/reject",
    tag = MODERATION_TAG,
    params(("id" = i32, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article rejected", body = ArticleResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "No such article", body = ErrorResponse),
        (status = 422, description = "Article is not pending", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn reject_article(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ArticleResponse>> {
    require_role(&user, ROLE_ADMIN)?;
    let article = state.services.approvals.reject_article(id).await?;
    Ok(Json(article.into()))
}

/// POST /api/reports/{id}/resolve
#[utoipa::path(
    post,
    path = "/reports/{id}/resolve",
    tag = MODERATION_TAG,
    params(("id" = i32, Path, description = "Report id")),
    responses(
        (status = 200, description = "Report resolved", body = ReportResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "No such report", body = ErrorResponse),
        (status = 422, description = "Report is not pending", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn resolve_report(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ReportResponse>> {
    require_role(&user, ROLE_ADMIN)?;
    let report = state.services.approvals.resolve_report(id).await?;
    Ok(Json(report.into()))
}

/// POST /api/reports/{id}/dismiss
#[utoipa::path(
    post,
    path = "/reports/{id}/dismiss",
    tag = MODERATION_TAG,
    params(("id" = i32, Path, description = "Report id")),
    responses(
        (status = 200, description = "Report dismissed", body = ReportResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "No such report", body = ErrorResponse),
        (status = 422, description = "Report is not pending", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn dismiss_report(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ReportResponse>> {
    require_role(&user, ROLE_ADMIN)?;
    let report = state.services.approvals.dismiss_report(id).await?;
    Ok(Json(report.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn actor(user_id: i32) -> AuthUser {
        AuthUser {
            user_id,
            email: "u@example.org".to_string(),
            username: "u".to_string(),
            role: "user".to_string(),
        }
    }

    fn request() -> ArticleRequest {
        ArticleRequest {
            title: "Betelgeuse dimming".to_string(),
            content: "Dust, not a supernova.".to_string(),
            celestial_body_id: Some(3),
        }
    }

    #[test]
    fn new_article_is_authored_by_caller() {
        let draft = Articles::create_draft(request(), &actor(8));
        assert_eq!(draft.author_id, 8);
        assert_eq!(draft.celestial_body_id, Some(3));
    }

    fn published_article() -> Article {
        Article {
            id: 1,
            author_id: 2,
            celestial_body_id: None,
            title: "old".to_string(),
            content: "old".to_string(),
            status: "approved".to_string(),
            published_at: Some(NaiveDateTime::default()),
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn new_article_awaits_moderation() {
        let draft = Articles::create_draft(request(), &actor(8));
        assert_eq!(draft.status, "pending");
        assert_eq!(draft.published_at, None);
    }

    #[test]
    fn editing_keeps_original_author() {
        let draft = Articles::update_draft(request(), &actor(8), &published_article()).unwrap();
        assert_eq!(draft.author_id, 2);
        assert_eq!(draft.title, "Betelgeuse dimming");
    }

    #[test]
    fn editing_published_article_returns_it_to_moderation() {
        let draft = Articles::update_draft(request(), &actor(2), &published_article()).unwrap();
        assert_eq!(draft.status, "pending");
        assert_eq!(draft.published_at, None);
    }

    #[test]
    fn comment_draft_takes_caller_as_author() {
        let draft = Comments::create_draft(
            CommentRequest {
                article_id: 4,
                content: "Nice shot".to_string(),
            },
            &actor(11),
        );
        assert_eq!(draft.author_id, 11);
        assert_eq!(draft.article_id, 4);
    }
}
