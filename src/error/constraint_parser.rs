use std::sync::OnceLock;

use regex::Regex;

/// Tables whose names contain underscores; checked before the generic split
/// so that `celestial_bodies_name_key` resolves to `celestial_bodies.name`.
const COMPOUND_TABLES: &[&str] = &[
    "celestial_bodies",
    "galaxies_quasars",
    "event_participants",
];

/// Parses PostgreSQL constraint violation messages into entity/field/value.
pub struct ConstraintParser;

struct RegexPatterns {
    key_value: Regex,
    column_name: Regex,
    table_name: Regex,
    relation_name: Regex,
    restricted_delete: Regex,
}

impl RegexPatterns {
    fn new() -> Self {
        Self {
            // "Key (email)=(a@b.c)"
            key_value: Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").expect("static regex"),
            column_name: Regex::new(r#"column "([^"]+)""#).expect("static regex"),
            table_name: Regex::new(r#"table "([^"]+)""#).expect("static regex"),
            relation_name: Regex::new(r#"relation "([^"]+)""#).expect("static regex"),
            restricted_delete: Regex::new(
                r#"^update or delete on table "([^"]+)" violates foreign key constraint "[^"]*" on table "([^"]+)""#,
            )
            .expect("static regex"),
        }
    }
}

static REGEX_PATTERNS: OnceLock<RegexPatterns> = OnceLock::new();

impl ConstraintParser {
    fn patterns() -> &'static RegexPatterns {
        REGEX_PATTERNS.get_or_init(RegexPatterns::new)
    }

    /// Returns `(entity, field, value)` for a unique violation.
    pub fn parse_unique_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        if let Some((entity, field)) =
            constraint_name.and_then(|c| Self::split_constraint_name(c, "_key"))
        {
            let value = Self::extract_key_value(message)
                .map(|(_, value)| value)
                .unwrap_or_else(|| "duplicate_value".to_string());
            return Some((entity, field, value));
        }

        let (field, value) = Self::extract_key_value(message)?;
        let entity = Self::extract_table(message).unwrap_or_else(|| "resource".to_string());
        Some((entity, field, value))
    }

    /// Returns `(entity, field)` for a not-null violation.
    pub fn parse_not_null_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        let field = Self::capture(&Self::patterns().column_name, message)?;
        let entity = Self::extract_table(message)
            .or_else(|| {
                constraint_name
                    .and_then(|c| Self::split_constraint_name(c, "_not_null"))
                    .map(|(entity, _)| entity)
            })
            .unwrap_or_else(|| "resource".to_string());
        Some((entity, field))
    }

    /// Returns `(entity, field, referenced_value)` for a foreign key violation.
    ///
    /// `articles_author_id_fkey` with `Key (author_id)=(7)` yields
    /// `("articles", "author_id", "7")`.
    pub fn parse_foreign_key_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        if let Some((entity, field)) =
            constraint_name.and_then(|c| Self::split_constraint_name(c, "_fkey"))
        {
            let value = Self::extract_key_value(message)
                .map(|(_, value)| value)
                .unwrap_or_else(|| "invalid_reference".to_string());
            return Some((entity, field, value));
        }

        let (field, value) = Self::extract_key_value(message)?;
        let entity = Self::extract_table(message).unwrap_or_else(|| "resource".to_string());
        Some((entity, field, value))
    }

    /// Returns `(entity, referenced_by)` when a foreign key blocked removing
    /// or re-keying a row that other rows still point at. `None` for the
    /// insert side of the same violation.
    pub fn parse_restricted_delete(message: &str) -> Option<(String, String)> {
        let caps = Self::patterns().restricted_delete.captures(message)?;
        Some((caps.get(1)?.as_str().to_string(), caps.get(2)?.as_str().to_string()))
    }

    /// Returns `(entity, field)` for a check violation.
    pub fn parse_check_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        if let Some(parsed) = constraint_name.and_then(|c| Self::split_constraint_name(c, "_check"))
        {
            return Some(parsed);
        }

        let field = Self::capture(&Self::patterns().column_name, message)?;
        let entity = Self::extract_table(message).unwrap_or_else(|| "resource".to_string());
        Some((entity, field))
    }

    /// Splits `<table>_<column>{suffix}` into `(table, column)`.
    pub fn split_constraint_name(constraint_name: &str, suffix: &str) -> Option<(String, String)> {
        let stem = constraint_name.strip_suffix(suffix)?;

        for table in COMPOUND_TABLES {
            if let Some(column) = stem
                .strip_prefix(table)
                .and_then(|rest| rest.strip_prefix('_'))
            {
                if column.is_empty() {
                    return None;
                }
                return Some((table.to_string(), column.to_string()));
            }
        }

        let (table, column) = stem.split_once('_')?;
        if table.is_empty() || column.is_empty() {
            return None;
        }
        Some((table.to_string(), column.to_string()))
    }

    /// `Key (field)=(value)` from the message detail.
    pub fn extract_key_value(message: &str) -> Option<(String, String)> {
        let caps = Self::patterns().key_value.captures(message)?;
        Some((caps.get(1)?.as_str().to_string(), caps.get(2)?.as_str().to_string()))
    }

    /// Table named in the message, either as `table "x"` or `relation "x"`.
    pub fn extract_table(message: &str) -> Option<String> {
        let patterns = Self::patterns();
        Self::capture(&patterns.table_name, message)
            .or_else(|| Self::capture(&patterns.relation_name, message))
    }

    fn capture(pattern: &Regex, message: &str) -> Option<String> {
        pattern
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_on_simple_table() {
        let message = "duplicate key value violates unique constraint \"users_email_key\"\nDETAIL: Key (email)=(vera@rubin.org) already exists.";
        let parsed = ConstraintParser::parse_unique_violation(message, Some("users_email_key"));
        assert_eq!(
            parsed,
            Some((
                "users".to_string(),
                "email".to_string(),
                "vera@rubin.org".to_string()
            ))
        );
    }

    #[test]
    fn unique_violation_on_compound_table_name() {
        let message = "duplicate key value violates unique constraint \"celestial_bodies_name_key\"\nDETAIL: Key (name)=(Vega) already exists.";
        let parsed =
            ConstraintParser::parse_unique_violation(message, Some("celestial_bodies_name_key"));
        assert_eq!(
            parsed,
            Some((
                "celestial_bodies".to_string(),
                "name".to_string(),
                "Vega".to_string()
            ))
        );
    }

    #[test]
    fn unique_violation_keeps_multi_word_column() {
        let parsed = ConstraintParser::split_constraint_name("stars_celestial_body_id_key", "_key");
        assert_eq!(
            parsed,
            Some(("stars".to_string(), "celestial_body_id".to_string()))
        );
    }

    #[test]
    fn unique_violation_without_constraint_falls_back_to_message() {
        let message = "duplicate key value violates unique constraint\nDETAIL: Key (username)=(hubble) already exists in table \"users\".";
        let parsed = ConstraintParser::parse_unique_violation(message, None);
        assert_eq!(
            parsed,
            Some((
                "users".to_string(),
                "username".to_string(),
                "hubble".to_string()
            ))
        );
    }

    #[test]
    fn foreign_key_violation_extracts_reference() {
        let message = "insert or update on table \"planets\" violates foreign key constraint \"planets_star_id_fkey\"\nDETAIL: Key (star_id)=(999) is not present in table \"stars\".";
        let parsed =
            ConstraintParser::parse_foreign_key_violation(message, Some("planets_star_id_fkey"));
        assert_eq!(
            parsed,
            Some((
                "planets".to_string(),
                "star_id".to_string(),
                "999".to_string()
            ))
        );
    }

    #[test]
    fn foreign_key_violation_on_join_table() {
        let parsed = ConstraintParser::split_constraint_name(
            "event_participants_user_id_fkey",
            "_fkey",
        );
        assert_eq!(
            parsed,
            Some(("event_participants".to_string(), "user_id".to_string()))
        );
    }

    #[test]
    fn restricted_delete_names_both_tables() {
        let message = "update or delete on table \"cities\" violates foreign key constraint \"addresses_city_id_fkey\" on table \"addresses\"";
        assert_eq!(
            ConstraintParser::parse_restricted_delete(message),
            Some(("cities".to_string(), "addresses".to_string()))
        );
    }

    #[test]
    fn insert_side_is_not_a_restricted_delete() {
        let message = "insert or update on table \"planets\" violates foreign key constraint \"planets_star_id_fkey\"";
        assert_eq!(ConstraintParser::parse_restricted_delete(message), None);
    }

    #[test]
    fn not_null_violation_reads_relation() {
        let message =
            "null value in column \"title\" of relation \"articles\" violates not-null constraint";
        let parsed = ConstraintParser::parse_not_null_violation(message, None);
        assert_eq!(parsed, Some(("articles".to_string(), "title".to_string())));
    }

    #[test]
    fn check_violation_from_constraint_name() {
        let message = "new row for relation \"galaxies_quasars\" violates check constraint \"galaxies_quasars_kind_check\"";
        let parsed =
            ConstraintParser::parse_check_violation(message, Some("galaxies_quasars_kind_check"));
        assert_eq!(
            parsed,
            Some(("galaxies_quasars".to_string(), "kind".to_string()))
        );
    }

    #[test]
    fn wrong_suffix_is_rejected() {
        assert_eq!(
            ConstraintParser::split_constraint_name("users_email_key", "_fkey"),
            None
        );
        assert_eq!(ConstraintParser::split_constraint_name("_key", "_key"), None);
    }

    #[test]
    fn unparseable_message_yields_none() {
        assert_eq!(
            ConstraintParser::parse_unique_violation("something odd happened", None),
            None
        );
        assert_eq!(
            ConstraintParser::parse_not_null_violation("something odd happened", None),
            None
        );
    }
}
