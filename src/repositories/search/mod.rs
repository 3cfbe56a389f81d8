//! Filter strategies for [`Repository::search`](super::Repository::search).
//!
//! Each strategy is a plain struct of optional predicates, deserialized
//! straight from query parameters. `query()` compiles the set predicates
//! into a boxed diesel statement; unset fields add nothing.

mod catalog;
mod content;
mod community;

pub use catalog::{AsteroidSearch, CelestialBodySearch, PlanetSearch, StarSearch};
pub use community::{CitySearch, DiscoverySearch, EventSearch, UserSearch};
pub use content::{ArticleSearch, ReportSearch};

use std::borrow::Cow;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use validator::{ValidationError, ValidationErrors};

diesel::define_sql_function!(fn lower(x: diesel::sql_types::Text) -> diesel::sql_types::Text);

/// `%term%` with LIKE metacharacters escaped, for substring `ILIKE`.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Trimmed value, or `None` when absent or blank.
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Accepts `a,b,c` and yields the non-empty trimmed parts.
pub(crate) fn comma_separated<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default())
}

/// Flags `max_field` when both bounds are set and `min` exceeds `max`.
pub(crate) fn check_range<T: PartialOrd>(
    errors: &mut ValidationErrors,
    min: Option<&T>,
    max: Option<&T>,
    max_field: &'static str,
) {
    if let (Some(min), Some(max)) = (min, max) {
        if min <= max {
            return;
        }
        errors.add(
            max_field,
            ValidationError::new("range")
                .with_message(Cow::Borrowed("Upper bound is below the lower bound")),
        );
    }
}

/// Flags `field` when it is set but does not parse as `S`.
pub(crate) fn check_status<S: FromStr<Err = String>>(
    errors: &mut ValidationErrors,
    value: &Option<String>,
    field: &'static str,
) {
    let Some(value) = non_blank(value) else {
        return;
    };
    if let Err(reason) = value.parse::<S>() {
        errors.add(
            field,
            ValidationError::new("status").with_message(Cow::Owned(reason)),
        );
    }
}

/// `Ok` when nothing was flagged.
pub(crate) fn into_result(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Implements [`Search`](crate::repositories::Search) by loading `query()`.
macro_rules! impl_search {
    ($strategy:ty => $entity:ty) => {
        #[async_trait::async_trait]
        impl $crate::repositories::Search<$entity> for $strategy {
            async fn run(
                &self,
                conn: &mut diesel_async::AsyncPgConnection,
            ) -> diesel::QueryResult<Vec<$entity>> {
                diesel_async::RunQueryDsl::load::<$entity>(self.query(), conn).await
            }
        }
    };
}

pub(crate) use impl_search;

#[cfg(test)]
pub(crate) fn render<Q>(query: &Q) -> String
where
    Q: diesel::query_builder::QueryFragment<diesel::pg::Pg>,
{
    diesel::debug_query::<diesel::pg::Pg, _>(query).to_string()
}
