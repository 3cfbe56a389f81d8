//! Article, comment and report DTOs.
//!
//! Inputs never carry the author or the moderation status: the author is
//! the caller and status changes go through the approval endpoints.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::UserProfileResponse;
use crate::models::{Article, Comment, Report};
use crate::repositories::ArticleDetail;

// ============================================================================
// Articles
// ============================================================================

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ArticleRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    #[schema(example = "Observing the 2026 Perseids")]
    pub title: String,
    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: String,
    /// Catalog entry the article is about
    pub celestial_body_id: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ArticleResponse {
    pub id: i32,
    pub author_id: i32,
    pub celestial_body_id: Option<i32>,
    pub title: String,
    pub content: String,
    /// `pending`, `approved` or `rejected`
    pub status: String,
    pub published_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl From<Article> for ArticleResponse {
    fn from(article: Article) -> Self {
        Self {
            id: article.id,
            author_id: article.author_id,
            celestial_body_id: article.celestial_body_id,
            title: article.title,
            content: article.content,
            status: article.status,
            published_at: article.published_at,
            created_at: article.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArticleDetailResponse {
    #[serde(flatten)]
    pub article: ArticleResponse,
    pub author: UserProfileResponse,
    pub comments: Vec<CommentResponse>,
}

impl From<ArticleDetail> for ArticleDetailResponse {
    fn from(detail: ArticleDetail) -> Self {
        Self {
            article: detail.article.into(),
            author: detail.author.into(),
            comments: detail.comments.into_iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// Comments
// ============================================================================

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CommentRequest {
    #[validate(range(min = 1, message = "article_id must be positive"))]
    pub article_id: i32,
    #[validate(length(min = 1, max = 2000, message = "Comment must be between 1 and 2000 characters"))]
    pub content: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentResponse {
    pub id: i32,
    pub article_id: i32,
    pub author_id: i32,
    pub content: String,
    pub created_at: NaiveDateTime,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            article_id: comment.article_id,
            author_id: comment.author_id,
            content: comment.content,
            created_at: comment.created_at,
        }
    }
}

// ============================================================================
// Reports
// ============================================================================

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ReportRequest {
    pub article_id: Option<i32>,
    pub comment_id: Option<i32>,
    #[validate(length(min = 1, max = 500, message = "Reason must be between 1 and 500 characters"))]
    #[schema(example = "Spam link in the last paragraph")]
    pub reason: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportResponse {
    pub id: i32,
    pub reporter_id: i32,
    pub article_id: Option<i32>,
    pub comment_id: Option<i32>,
    pub reason: String,
    /// `pending`, `resolved` or `dismissed`
    pub status: String,
    pub created_at: NaiveDateTime,
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> Self {
        Self {
            id: report.id,
            reporter_id: report.reporter_id,
            article_id: report.article_id,
            comment_id: report.comment_id,
            reason: report.reason,
            status: report.status,
            created_at: report.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_request_ignores_workflow_fields() {
        let request: ArticleRequest = serde_json::from_str(
            r#"{"title":"Jupiter opposition","content":"Tonight.","status":"approved","author_id":1}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.celestial_body_id, None);
    }

    #[test]
    fn overlong_comment_is_invalid() {
        let request = CommentRequest {
            article_id: 1,
            content: "x".repeat(2001),
        };
        assert!(request.validate().unwrap_err().field_errors().contains_key("content"));
    }
}
