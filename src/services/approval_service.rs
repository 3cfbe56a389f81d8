//! Moderation workflows for articles, discoveries and reports.
//!
//! Every transition starts from `pending`. The status check and the write
//! happen in one conditional `UPDATE ... WHERE status = 'pending'`, so two
//! moderators racing on the same item cannot both succeed.

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::info;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult, DatabaseErrorConverter};
use crate::models::{
    Article, CelestialBody, Discovery, NewCelestialBody, Report, ReportStatus, ReviewStatus,
};

/// Result of approving a discovery: the updated row and the catalog entry
/// created for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApprovedDiscovery {
    pub discovery: Discovery,
    pub body: CelestialBody,
}

#[derive(Clone)]
pub struct ApprovalService {
    pool: AsyncDbPool,
}

impl ApprovalService {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Approves a pending article and stamps `published_at`.
    pub async fn approve_article(&self, article_id: i32) -> AppResult<Article> {
        self.review_article(article_id, ReviewStatus::Approved).await
    }

    pub async fn reject_article(&self, article_id: i32) -> AppResult<Article> {
        self.review_article(article_id, ReviewStatus::Rejected).await
    }

    async fn review_article(&self, article_id: i32, decision: ReviewStatus) -> AppResult<Article> {
        use crate::schema::articles::dsl::*;
        let mut conn = self.pool.get().await?;

        let published = (decision == ReviewStatus::Approved).then(|| Utc::now().naive_utc());
        let updated = diesel::update(
            articles
                .find(article_id)
                .filter(status.eq(ReviewStatus::Pending.as_str())),
        )
        .set((status.eq(decision.as_str()), published_at.eq(published)))
        .returning(Article::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "review article"))?;

        match updated {
            Some(article) => {
                info!(article_id, status = %decision, "Article reviewed");
                Ok(article)
            }
            None => {
                let current = articles
                    .find(article_id)
                    .select(status)
                    .first::<String>(&mut conn)
                    .await
                    .optional()?;
                Err(not_pending("articles", article_id, current))
            }
        }
    }

    /// Turns a pending discovery into a catalog entry.
    ///
    /// Creates the celestial body and links it to the discovery in a single
    /// transaction; if either write fails neither is kept.
    pub async fn approve_discovery(&self, discovery_id: i32) -> AppResult<ApprovedDiscovery> {
        let mut conn = self.pool.get().await?;

        let approved = conn
            .transaction::<_, AppError, _>(|conn| {
                async move { Self::approve_discovery_in(conn, discovery_id).await }.scope_boxed()
            })
            .await?;

        info!(
            discovery_id,
            celestial_body_id = approved.body.id,
            "Discovery approved"
        );
        Ok(approved)
    }

    async fn approve_discovery_in(
        conn: &mut AsyncPgConnection,
        discovery_id: i32,
    ) -> AppResult<ApprovedDiscovery> {
        use crate::schema::{celestial_bodies, discoveries};

        let discovery = discoveries::table
            .find(discovery_id)
            .select(Discovery::as_select())
            .for_update()
            .first(conn)
            .await
            .optional()?
            .ok_or_else(|| AppError::not_found("discoveries", discovery_id))?;

        if discovery.status != ReviewStatus::Pending.as_str() {
            return Err(not_pending(
                "discoveries",
                discovery_id,
                Some(discovery.status),
            ));
        }

        let body = diesel::insert_into(celestial_bodies::table)
            .values(&NewCelestialBody {
                name: discovery.name.clone(),
                body_type: discovery.body_type.clone(),
                mass_kg: None,
                radius_km: None,
                distance_ly: None,
                discovered_on: Some(discovery.discovered_on),
                description: Some(discovery.description.clone()),
                image_url: None,
            })
            .returning(CelestialBody::as_returning())
            .get_result(conn)
            .await?;

        let discovery = diesel::update(discoveries::table.find(discovery_id))
            .set((
                discoveries::status.eq(ReviewStatus::Approved.as_str()),
                discoveries::celestial_body_id.eq(Some(body.id)),
            ))
            .returning(Discovery::as_returning())
            .get_result(conn)
            .await?;

        Ok(ApprovedDiscovery { discovery, body })
    }

    pub async fn reject_discovery(&self, discovery_id: i32) -> AppResult<Discovery> {
        use crate::schema::discoveries::dsl::*;
        let mut conn = self.pool.get().await?;

        let updated = diesel::update(
            discoveries
                .find(discovery_id)
                .filter(status.eq(ReviewStatus::Pending.as_str())),
        )
        .set(status.eq(ReviewStatus::Rejected.as_str()))
        .returning(Discovery::as_returning())
        .get_result(&mut conn)
        .await
        .optional()?;

        match updated {
            Some(discovery) => Ok(discovery),
            None => {
                let current = discoveries
                    .find(discovery_id)
                    .select(status)
                    .first::<String>(&mut conn)
                    .await
                    .optional()?;
                Err(not_pending("discoveries", discovery_id, current))
            }
        }
    }

    pub async fn resolve_report(&self, report_id: i32) -> AppResult<Report> {
        self.close_report(report_id, ReportStatus::Resolved).await
    }

    pub async fn dismiss_report(&self, report_id: i32) -> AppResult<Report> {
        self.close_report(report_id, ReportStatus::Dismissed).await
    }

    async fn close_report(&self, report_id: i32, outcome: ReportStatus) -> AppResult<Report> {
        use crate::schema::reports::dsl::*;
        let mut conn = self.pool.get().await?;

        let updated = diesel::update(
            reports
                .find(report_id)
                .filter(status.eq(ReportStatus::Pending.as_str())),
        )
        .set(status.eq(outcome.as_str()))
        .returning(Report::as_returning())
        .get_result(&mut conn)
        .await
        .optional()?;

        match updated {
            Some(report) => {
                info!(report_id, status = %outcome, "Report closed");
                Ok(report)
            }
            None => {
                let current = reports
                    .find(report_id)
                    .select(status)
                    .first::<String>(&mut conn)
                    .await
                    .optional()?;
                Err(not_pending("reports", report_id, current))
            }
        }
    }
}

/// Error for a transition that did not apply: the row is missing, or it
/// exists but is no longer pending.
fn not_pending(entity: &str, id: i32, current: Option<String>) -> AppError {
    match current {
        None => AppError::not_found(entity, id),
        Some(current) => AppError::unprocessable(format!(
            "{entity} {id} is {current}; only pending items can change status"
        )),
    }
}
