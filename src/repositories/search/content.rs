use chrono::{NaiveDate, NaiveTime};
use diesel::pg::Pg;
use diesel::prelude::*;
use serde::Deserialize;
use utoipa::IntoParams;
use validator::{Validate, ValidationErrors};

use super::{check_range, check_status, contains_pattern, impl_search, into_result, non_blank};
use crate::models::{Article, Report, ReportStatus, ReviewStatus};
use crate::schema::{articles, reports};

/// Articles by title, author and moderation status, newest first.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ArticleSearch {
    /// Case-insensitive title substring
    pub title: Option<String>,
    pub author_id: Option<i32>,

    /// `pending`, `approved` or `rejected`
    #[param(example = "approved")]
    pub status: Option<String>,
}

impl Validate for ArticleSearch {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_status::<ReviewStatus>(&mut errors, &self.status, "status");
        into_result(errors)
    }
}

impl ArticleSearch {
    pub fn query(&self) -> articles::BoxedQuery<'static, Pg> {
        let mut query = articles::table.into_boxed();

        if let Some(title) = non_blank(&self.title) {
            query = query.filter(articles::title.ilike(contains_pattern(title)));
        }
        if let Some(author_id) = self.author_id {
            query = query.filter(articles::author_id.eq(author_id));
        }
        if let Some(status) = non_blank(&self.status) {
            query = query.filter(articles::status.eq(status.to_string()));
        }

        query.order((articles::created_at.desc(), articles::id.desc()))
    }
}

impl_search!(ArticleSearch => Article);

/// Reports by status, reporter and creation date, newest first.
///
/// `from` and `to` are whole days; `to` includes the entire day.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportSearch {
    /// `pending`, `resolved` or `dismissed`
    pub status: Option<String>,
    pub reporter_id: Option<i32>,

    #[param(value_type = Option<String>, format = Date, example = "2025-01-01")]
    pub from: Option<NaiveDate>,

    #[param(value_type = Option<String>, format = Date)]
    pub to: Option<NaiveDate>,
}

impl Validate for ReportSearch {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_status::<ReportStatus>(&mut errors, &self.status, "status");
        check_range(&mut errors, self.from.as_ref(), self.to.as_ref(), "to");
        into_result(errors)
    }
}

impl ReportSearch {
    pub fn query(&self) -> reports::BoxedQuery<'static, Pg> {
        let mut query = reports::table.into_boxed();

        if let Some(status) = non_blank(&self.status) {
            query = query.filter(reports::status.eq(status.to_string()));
        }
        if let Some(reporter_id) = self.reporter_id {
            query = query.filter(reports::reporter_id.eq(reporter_id));
        }
        if let Some(from) = self.from {
            query = query.filter(reports::created_at.ge(from.and_time(NaiveTime::MIN)));
        }
        if let Some(next_day) = self.to.and_then(|to| to.succ_opt()) {
            query = query.filter(reports::created_at.lt(next_day.and_time(NaiveTime::MIN)));
        }

        query.order((reports::created_at.desc(), reports::id.desc()))
    }
}

impl_search!(ReportSearch => Report);
