use chrono::NaiveDateTime;
use diesel::pg::Pg;
use diesel::prelude::*;
use serde::Deserialize;
use utoipa::IntoParams;
use validator::{Validate, ValidationErrors};

use super::{check_range, check_status, contains_pattern, impl_search, into_result, lower, non_blank};
use crate::models::{City, Discovery, Event, ReviewStatus, User};
use crate::schema::{cities, discoveries, events, users};

/// Cities by name and country.
///
/// Exact (case-insensitive) name matches come first, then the rest
/// alphabetically.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct CitySearch {
    #[param(example = "Paris")]
    pub name: Option<String>,

    /// Case-insensitive exact country
    pub country: Option<String>,
}

impl CitySearch {
    pub fn query(&self) -> cities::BoxedQuery<'static, Pg> {
        let mut query = cities::table.into_boxed();

        if let Some(country) = non_blank(&self.country) {
            query = query.filter(lower(cities::country).eq(country.to_lowercase()));
        }

        match non_blank(&self.name) {
            Some(name) => query
                .filter(cities::name.ilike(contains_pattern(name)))
                .order((
                    lower(cities::name).eq(name.to_lowercase()).desc(),
                    cities::name.asc(),
                )),
            None => query.order(cities::name.asc()),
        }
    }
}

impl_search!(CitySearch => City);

/// Events by title within a start-time window, soonest first.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventSearch {
    pub title: Option<String>,

    /// Earliest start, inclusive
    #[param(value_type = Option<String>, example = "2025-08-12T00:00:00")]
    pub from: Option<NaiveDateTime>,

    /// Latest start, inclusive
    #[param(value_type = Option<String>)]
    pub to: Option<NaiveDateTime>,
}

impl Validate for EventSearch {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_range(&mut errors, self.from.as_ref(), self.to.as_ref(), "to");
        into_result(errors)
    }
}

impl EventSearch {
    pub fn query(&self) -> events::BoxedQuery<'static, Pg> {
        let mut query = events::table.into_boxed();

        if let Some(title) = non_blank(&self.title) {
            query = query.filter(events::title.ilike(contains_pattern(title)));
        }
        if let Some(from) = self.from {
            query = query.filter(events::starts_at.ge(from));
        }
        if let Some(to) = self.to {
            query = query.filter(events::starts_at.le(to));
        }

        query.order((events::starts_at.asc(), events::id.asc()))
    }
}

impl_search!(EventSearch => Event);

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DiscoverySearch {
    /// `pending`, `approved` or `rejected`
    pub status: Option<String>,
    pub discoverer_id: Option<i32>,
}

impl Validate for DiscoverySearch {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_status::<ReviewStatus>(&mut errors, &self.status, "status");
        into_result(errors)
    }
}

impl DiscoverySearch {
    pub fn query(&self) -> discoveries::BoxedQuery<'static, Pg> {
        let mut query = discoveries::table.into_boxed();

        if let Some(status) = non_blank(&self.status) {
            query = query.filter(discoveries::status.eq(status.to_string()));
        }
        if let Some(discoverer_id) = self.discoverer_id {
            query = query.filter(discoveries::discoverer_id.eq(discoverer_id));
        }

        query.order(discoveries::id.asc())
    }
}

impl_search!(DiscoverySearch => Discovery);

/// Users whose username or email contains `q`, optionally by role.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct UserSearch {
    pub q: Option<String>,
    pub role: Option<String>,
}

impl UserSearch {
    pub fn query(&self) -> users::BoxedQuery<'static, Pg> {
        let mut query = users::table.into_boxed();

        // Username only: this search is public and emails are not.
        if let Some(term) = non_blank(&self.q) {
            query = query.filter(users::username.ilike(contains_pattern(term)));
        }
        if let Some(role) = non_blank(&self.role) {
            query = query.filter(users::role.eq(role.to_string()));
        }

        query.order(users::username.asc())
    }
}

impl_search!(UserSearch => User);

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::repositories::search::render;

    #[test]
    fn city_search_ranks_exact_name_first() {
        let search = CitySearch {
            name: Some("Paris".to_string()),
            country: Some("France".to_string()),
        };
        let sql = render(&search.query());

        assert!(sql.contains(r#"lower("cities"."country") = $1"#), "{sql}");
        assert!(sql.contains(r#""cities"."name" ILIKE $2"#), "{sql}");
        assert!(
            sql.contains(r#"ORDER BY lower("cities"."name") = $3 DESC, "cities"."name" ASC"#),
            "{sql}"
        );
        assert!(sql.contains(r#""france""#), "{sql}");
        assert!(sql.contains(r#""paris""#), "{sql}");
    }

    #[test]
    fn city_search_without_name_is_alphabetical() {
        let sql = render(&CitySearch::default().query());

        assert!(!sql.contains("lower("), "{sql}");
        assert!(sql.contains(r#"ORDER BY "cities"."name" ASC"#), "{sql}");
    }

    #[test]
    fn event_search_bounds_the_start_time() {
        let day = NaiveDate::from_ymd_opt(2025, 8, 12).unwrap();
        let search = EventSearch {
            title: None,
            from: day.and_hms_opt(0, 0, 0),
            to: day.and_hms_opt(23, 59, 59),
        };
        let sql = render(&search.query());

        assert!(sql.contains(r#""events"."starts_at" >= $1"#), "{sql}");
        assert!(sql.contains(r#""events"."starts_at" <= $2"#), "{sql}");
        assert!(
            sql.contains(r#"ORDER BY "events"."starts_at" ASC"#),
            "{sql}"
        );
    }

    #[test]
    fn discovery_search_filters_status_and_discoverer() {
        let search = DiscoverySearch {
            status: Some("pending".to_string()),
            discoverer_id: Some(2),
        };
        let sql = render(&search.query());

        assert!(sql.contains(r#""discoveries"."status" = $1"#), "{sql}");
        assert!(sql.contains(r#""discoveries"."discoverer_id" = $2"#), "{sql}");
    }

    #[test]
    fn user_search_never_matches_on_email() {
        let search = UserSearch {
            q: Some("ann".to_string()),
            role: Some("admin".to_string()),
        };
        let sql = render(&search.query());

        assert!(sql.contains(r#""users"."username" ILIKE $1"#), "{sql}");
        assert!(!sql.contains("email"), "{sql}");
        assert!(sql.contains(r#""users"."role" = $2"#), "{sql}");
    }

    #[test]
    fn event_window_must_not_be_inverted() {
        let at = |day| {
            NaiveDate::from_ymd_opt(2025, 8, day)
                .unwrap()
                .and_hms_opt(21, 0, 0)
                .unwrap()
        };
        let inverted = EventSearch {
            from: Some(at(13)),
            to: Some(at(12)),
            ..Default::default()
        };
        assert!(inverted.validate().unwrap_err().field_errors().contains_key("to"));

        let same_instant = EventSearch {
            from: Some(at(12)),
            to: Some(at(12)),
            ..Default::default()
        };
        assert!(same_instant.validate().is_ok());

        let unknown = DiscoverySearch {
            status: Some("archived".to_string()),
            discoverer_id: None,
        };
        assert!(unknown.validate().is_err());
    }
}
