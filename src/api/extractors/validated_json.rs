//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::AppError;

/// Validated JSON extractor that automatically validates requests.
///
/// # Example
///
/// ```rust,ignore
/// use serde::Deserialize;
/// use validator::Validate;
/// use member_auth::api::extractors::ValidatedJson;
///
/// #[derive(Deserialize, Validate)]
/// struct SignupRequest {
///     #[validate(length(min = 1, max = 30))]
///     name: String,
///     #[validate(length(min = 8))]
///     password: String,
/// }
///
/// async fn signup(ValidatedJson(payload): ValidatedJson<SignupRequest>) {
///     // payload is already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(format_validation_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Format validation errors into a user-friendly string, in field order
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{body::Body, http};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct NameRequest {
        #[validate(length(min = 1, max = 30, message = "Name must be 1 to 30 characters"))]
        name: String,
    }

    fn json_request(body: &'static str) -> Request {
        http::Request::builder()
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_accepts_valid_payload() {
        let ValidatedJson(payload) =
            ValidatedJson::<NameRequest>::from_request(json_request(r#"{"name":"alice"}"#), &())
                .await
                .unwrap();

        assert_eq!(payload.name, "alice");
    }

    #[tokio::test]
    async fn test_rejects_invalid_payload_with_message() {
        let result =
            ValidatedJson::<NameRequest>::from_request(json_request(r#"{"name":""}"#), &()).await;

        match result {
            Err(AppError::Validation(message)) => {
                assert_eq!(message, "Name must be 1 to 30 characters")
            }
            _ => panic!("expected a validation error"),
        }
    }

    #[tokio::test]
    async fn test_rejects_malformed_json() {
        let result = ValidatedJson::<NameRequest>::from_request(json_request("{"), &()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
