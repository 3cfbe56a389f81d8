//! Error handler for converting AppError to HTTP responses.
//!
//! `IntoResponse for AppError` picks the status code and JSON body;
//! [`global_error_handler`] then stamps the request id onto every error
//! body and wraps plain-text errors produced by axum itself (unknown
//! routes, wrong methods, body limits) in the same envelope.

use axum::{
    Json,
    body::{Body, to_bytes},
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::RequestId;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;

/// Largest error body the envelope middleware will buffer.
const MAX_ERROR_BODY: usize = 64 * 1024;

impl IntoResponse for AppError {
    /// Converts an AppError into an HTTP response.
    ///
    /// # Status Code Mapping
    /// - NotFound → 404 NOT_FOUND
    /// - Duplicate, StillReferenced → 409 CONFLICT
    /// - Validation, ValidationErrors, BadRequest → 400 BAD_REQUEST
    /// - UnprocessableContent → 422 UNPROCESSABLE_ENTITY
    /// - Unauthorized → 401 UNAUTHORIZED
    /// - Forbidden → 403 FORBIDDEN
    /// - BadGateway → 502 BAD_GATEWAY
    /// - Database, Configuration, Internal → 500 INTERNAL_SERVER_ERROR
    /// - ConnectionPool → 503 SERVICE_UNAVAILABLE
    ///
    /// Sources of server-side errors are logged, never serialized.
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        }

        let body = match &self {
            AppError::NotFound {
                entity,
                field,
                value,
            } => ErrorResponse::not_found_error(entity, field, value),
            AppError::Duplicate {
                entity,
                field,
                value,
            } => ErrorResponse::duplicate_error(entity, field, value),
            AppError::StillReferenced {
                entity,
                referenced_by,
            } => ErrorResponse::new(
                "STILL_REFERENCED",
                format!("Cannot remove from {entity} while {referenced_by} rows point at it"),
            )
            .with_details(json!({ "entity": entity, "referenced_by": referenced_by })),
            AppError::Validation { field, reason } => ErrorResponse::validation_error(field, reason),
            AppError::ValidationErrors { errors } => ErrorResponse::validation_errors(errors),
            AppError::BadRequest { message }
            | AppError::UnprocessableContent { message }
            | AppError::Unauthorized { message }
            | AppError::Forbidden { message } => ErrorResponse::new(error_to_code(&self), message),
            AppError::BadGateway { message, .. } => {
                ErrorResponse::new("BAD_GATEWAY", format!("Upstream storage failed: {message}"))
            }
            AppError::Database { operation, .. } => ErrorResponse::new(
                "DATABASE_ERROR",
                format!("Database operation failed: {operation}"),
            )
            .with_details(json!({ "operation": operation })),
            AppError::Configuration { key, .. } => {
                ErrorResponse::new("CONFIGURATION_ERROR", format!("Configuration error: {key}"))
            }
            AppError::ConnectionPool { .. } => {
                ErrorResponse::new("SERVICE_UNAVAILABLE", "Database connection unavailable")
            }
            AppError::Internal { .. } => {
                ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred")
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Maps an AppError variant to its corresponding HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Duplicate { .. } | AppError::StillReferenced { .. } => StatusCode::CONFLICT,
        AppError::Validation { .. }
        | AppError::ValidationErrors { .. }
        | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::UnprocessableContent { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
        AppError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
        AppError::Database { .. } | AppError::Configuration { .. } | AppError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Maps an AppError variant to its error code string.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::Duplicate { .. } => "DUPLICATE_ENTRY",
        AppError::StillReferenced { .. } => "STILL_REFERENCED",
        AppError::Validation { .. } | AppError::ValidationErrors { .. } => "VALIDATION_ERROR",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::UnprocessableContent { .. } => "UNPROCESSABLE_CONTENT",
        AppError::Unauthorized { .. } => "UNAUTHORIZED",
        AppError::Forbidden { .. } => "FORBIDDEN",
        AppError::BadGateway { .. } => "BAD_GATEWAY",
        AppError::Database { .. } => "DATABASE_ERROR",
        AppError::Configuration { .. } => "CONFIGURATION_ERROR",
        AppError::ConnectionPool { .. } => "SERVICE_UNAVAILABLE",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

/// Brings every 4xx/5xx response into the [`ErrorResponse`] shape and adds
/// the request id.
///
/// Must run inside `request_id_middleware` so the id is in the extensions.
pub async fn global_error_handler(request: Request, next: Next) -> Response {
    let request_id = request.extensions().get::<RequestId>().cloned();
    let response = next.run(request).await;

    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_ERROR_BODY).await {
        Ok(bytes) => bytes,
        Err(_) => return Response::from_parts(parts, Body::empty()),
    };

    let mut envelope = if is_json {
        match serde_json::from_slice::<serde_json::Value>(&bytes) {
            Ok(value) if value.is_object() => value,
            _ => return Response::from_parts(parts, Body::from(bytes)),
        }
    } else {
        let text = String::from_utf8_lossy(&bytes).trim().to_string();
        json!(fallback_error(status, text))
    };

    if let (Some(RequestId(id)), Some(object)) = (request_id, envelope.as_object_mut()) {
        object.entry("request_id").or_insert(json!(id));
    }

    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.remove(header::CONTENT_TYPE);
    (parts, Json(envelope)).into_response()
}

/// Error body for responses axum produced without going through `AppError`.
fn fallback_error(status: StatusCode, original: String) -> ErrorResponse {
    let (code, default_message) = match status {
        StatusCode::BAD_REQUEST => ("BAD_REQUEST", "Bad request - invalid or malformed request"),
        StatusCode::NOT_FOUND => ("NOT_FOUND", "The requested resource was not found"),
        StatusCode::METHOD_NOT_ALLOWED => {
            ("METHOD_NOT_ALLOWED", "HTTP method not allowed for this endpoint")
        }
        StatusCode::UNSUPPORTED_MEDIA_TYPE => ("UNSUPPORTED_MEDIA_TYPE", "Unsupported media type"),
        StatusCode::PAYLOAD_TOO_LARGE => ("PAYLOAD_TOO_LARGE", "Request payload too large"),
        StatusCode::UNPROCESSABLE_ENTITY => ("UNPROCESSABLE_CONTENT", "Unprocessable content"),
        StatusCode::REQUEST_TIMEOUT => ("REQUEST_TIMEOUT", "Request timeout"),
        StatusCode::SERVICE_UNAVAILABLE => {
            ("SERVICE_UNAVAILABLE", "Service temporarily unavailable")
        }
        s if s.is_server_error() => ("INTERNAL_ERROR", "An internal error occurred"),
        _ => ("UNKNOWN_ERROR", "An unknown error occurred"),
    };

    // Server-side text from axum may carry internals; keep the generic message.
    if original.is_empty() || status.is_server_error() {
        ErrorResponse::new(code, default_message)
    } else {
        ErrorResponse::new(code, original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationFieldError;
    use axum::{Router, middleware, routing::get};
    use tower::ServiceExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn status_codes_follow_variant() {
        let cases = [
            (AppError::not_found("stars", 1), StatusCode::NOT_FOUND),
            (
                AppError::Duplicate {
                    entity: "users".into(),
                    field: "email".into(),
                    value: "a@b.c".into(),
                },
                StatusCode::CONFLICT,
            ),
            (
                AppError::StillReferenced {
                    entity: "cities".into(),
                    referenced_by: "addresses".into(),
                },
                StatusCode::CONFLICT,
            ),
            (
                AppError::Validation {
                    field: "city_id".into(),
                    reason: "references a missing row".into(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::ValidationErrors { errors: vec![] },
                StatusCode::BAD_REQUEST,
            ),
            (AppError::bad_request("nope"), StatusCode::BAD_REQUEST),
            (
                AppError::UnprocessableContent {
                    message: "settled".into(),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (AppError::unauthorized("who"), StatusCode::UNAUTHORIZED),
            (
                AppError::Forbidden {
                    message: "admins only".into(),
                },
                StatusCode::FORBIDDEN,
            ),
            (
                AppError::BadGateway {
                    message: "blob PUT".into(),
                    source: anyhow::anyhow!("503"),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::Database {
                    operation: "insert stars".into(),
                    source: anyhow::anyhow!("boom"),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::ConnectionPool {
                    source: anyhow::anyhow!("timeout"),
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::Internal {
                    source: anyhow::anyhow!("panic"),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error_to_status_code(&error), expected, "{error:?}");
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn validation_errors_are_listed_in_details() {
        let error = AppError::ValidationErrors {
            errors: vec![ValidationFieldError {
                field: "name".into(),
                message: "Name must be between 1 and 100 characters".into(),
            }],
        };

        let body = body_json(error.into_response()).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"]["errors"][0]["field"], "name");
    }

    #[tokio::test]
    async fn blocked_delete_names_the_referencing_table() {
        let error = AppError::StillReferenced {
            entity: "cities".into(),
            referenced_by: "addresses".into(),
        };

        let body = body_json(error.into_response()).await;
        assert_eq!(body["code"], "STILL_REFERENCED");
        assert_eq!(body["details"]["referenced_by"], "addresses");
        assert!(!body["message"].as_str().unwrap().contains("missing row"));
    }

    #[tokio::test]
    async fn internal_error_hides_source() {
        let error = AppError::Internal {
            source: anyhow::anyhow!("password=hunter2"),
        };

        let body = body_json(error.into_response()).await;
        assert_eq!(body["message"], "An internal error occurred");
        assert!(!body.to_string().contains("hunter2"));
    }

    fn app() -> Router {
        async fn missing() -> Result<(), AppError> {
            Err(AppError::not_found("comets", 7))
        }

        Router::new()
            .route("/missing", get(missing))
            .layer(middleware::from_fn(global_error_handler))
            .layer(middleware::from_fn(
                |mut request: Request, next: Next| async move {
                    request
                        .extensions_mut()
                        .insert(RequestId("req-1".to_string()));
                    next.run(request).await
                },
            ))
    }

    #[tokio::test]
    async fn app_errors_carry_request_id() {
        let response = app()
            .oneshot(Request::get("/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["request_id"], "req-1");
    }

    #[tokio::test]
    async fn unknown_route_is_wrapped_in_envelope() {
        let response = app()
            .oneshot(Request::get("/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["message"], "The requested resource was not found");
        assert_eq!(body["request_id"], "req-1");
    }
}
