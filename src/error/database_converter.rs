use std::borrow::Cow;

use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

use crate::error::{AppError, ConstraintParser};

/// Converts diesel errors into structured [`AppError`] variants.
///
/// Unique violations become `Duplicate`. A foreign key violation raised by a
/// delete becomes `StillReferenced`; raised by a write it becomes
/// `Validation` naming the offending column, as do not-null and check
/// violations. Anything the parser cannot make sense of stays a `Database`
/// error.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info.as_ref(), operation)
            }
            DieselError::NotFound => AppError::NotFound {
                entity: "resource".to_string(),
                field: "id".to_string(),
                value: "unknown".to_string(),
            },
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: &(dyn DatabaseErrorInformation + Send + Sync),
        operation: &str,
    ) -> AppError {
        // libpq keeps `Key (col)=(value)` in the detail line
        let message: Cow<'_, str> = match info.details() {
            Some(detail) => Cow::Owned(format!("{}\nDETAIL: {detail}", info.message())),
            None => Cow::Borrowed(info.message()),
        };
        let message = message.as_ref();
        let constraint = info.constraint_name();

        let converted = match kind {
            DatabaseErrorKind::UniqueViolation => {
                ConstraintParser::parse_unique_violation(message, constraint).map(
                    |(entity, field, value)| AppError::Duplicate {
                        entity,
                        field,
                        value,
                    },
                )
            }
            DatabaseErrorKind::ForeignKeyViolation => {
                match ConstraintParser::parse_restricted_delete(message) {
                    Some((entity, referenced_by)) => Some(AppError::StillReferenced {
                        entity,
                        referenced_by,
                    }),
                    None => ConstraintParser::parse_foreign_key_violation(message, constraint).map(
                        |(entity, field, value)| AppError::Validation {
                            field,
                            reason: format!("{entity} references a missing row ({value})"),
                        },
                    ),
                }
            }
            DatabaseErrorKind::NotNullViolation => {
                ConstraintParser::parse_not_null_violation(message, constraint).map(
                    |(entity, field)| AppError::Validation {
                        field,
                        reason: format!("Field is required for {entity}"),
                    },
                )
            }
            DatabaseErrorKind::CheckViolation => {
                ConstraintParser::parse_check_violation(message, constraint).map(
                    |(entity, field)| AppError::Validation {
                        field,
                        reason: format!("Value rejected by {entity} check constraint"),
                    },
                )
            }
            _ => None,
        };

        converted.unwrap_or_else(|| AppError::Database {
            operation: operation.to_string(),
            source: anyhow::Error::msg(format!("{kind:?}: {message}")),
        })
    }
}
