use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// JSON body that must pass `validator` rules before reaching the handler.
///
/// Malformed JSON is a `BadRequest`; rule violations are `ValidationErrors`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Self> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Query string counterpart of [`ValidatedJson`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> AppResult<Self> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidatedQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct CityInput {
        #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
        name: String,
        #[validate(length(min = 2, max = 100, message = "Country must be between 2 and 100 characters"))]
        country: String,
    }

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method(Method::POST)
            .uri("/cities")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_json() {
        let request = json_request(r#"{"name":"Lyon","country":"France"}"#);

        let ValidatedJson(city) = ValidatedJson::<CityInput>::from_request(request, &())
            .await
            .unwrap();

        assert_eq!(city.name, "Lyon");
        assert_eq!(city.country, "France");
    }

    #[tokio::test]
    async fn test_validation_errors_are_collected() {
        let request = json_request(r#"{"name":"","country":"F"}"#);

        let error = ValidatedJson::<CityInput>::from_request(request, &())
            .await
            .unwrap_err();

        match error {
            AppError::ValidationErrors { errors } => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["country", "name"]);
                assert!(errors[1].message.contains("between 1 and 100"));
            }
            _ => panic!("Expected ValidationErrors error, got {:?}", error),
        }
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let request = json_request(r#"{"name":"Lyon"}"#);

        let error = ValidatedJson::<CityInput>::from_request(request, &())
            .await
            .unwrap_err();

        assert!(matches!(error, AppError::BadRequest { .. }), "{error:?}");
    }

    #[tokio::test]
    async fn test_wrong_content_type_is_bad_request() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/cities")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("name=Lyon"))
            .unwrap();

        let error = ValidatedJson::<CityInput>::from_request(request, &())
            .await
            .unwrap_err();

        assert!(matches!(error, AppError::BadRequest { .. }), "{error:?}");
    }

    #[tokio::test]
    async fn test_validated_query() {
        let request = Request::builder()
            .uri("/cities?name=Oslo&country=Norway")
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let ValidatedQuery(city) = ValidatedQuery::<CityInput>::from_request_parts(&mut parts, &())
            .await
            .unwrap();

        assert_eq!(city.name, "Oslo");
    }
}
