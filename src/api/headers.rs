//! Token headers on the wire.
//!
//! Login and reissue answer with `Authorization: Bearer <access>` and
//! `RefreshToken: <refresh>`; reissue reads the same pair back. Header names
//! are case-insensitive, so `RefreshToken` is emitted as `refreshtoken`.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponseParts, ResponseParts},
};

use crate::config::{AUTHORIZATION_HEADER, BEARER_TOKEN_PREFIX, REFRESH_TOKEN_HEADER};
use crate::errors::{AppError, AppResult};
use crate::security::TokenPair;

/// Access token from `Authorization: Bearer <token>`, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_TOKEN_PREFIX))
}

/// Tokens presented to the reissue endpoint.
///
/// Only a missing refresh token is rejected here. A missing or unprefixed
/// access token is passed on as `None`, so a bad refresh token is still
/// reported as `InvalidToken` by the service's refresh check.
#[derive(Debug, Clone)]
pub struct TokenHeaders {
    pub access_token: Option<String>,
    pub refresh_token: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for TokenHeaders
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let refresh_token = parts
            .headers
            .get(REFRESH_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .ok_or(AppError::InvalidToken)?;

        Ok(Self {
            access_token: bearer_token(&parts.headers).map(str::to_string),
            refresh_token: refresh_token.to_string(),
        })
    }
}

impl IntoResponseParts for TokenPair {
    type Error = AppError;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        let access = header_value(&format!("{}{}", BEARER_TOKEN_PREFIX, self.access_token))?;
        let refresh = header_value(&self.refresh_token)?;

        let headers = res.headers_mut();
        headers.insert(header_name(AUTHORIZATION_HEADER)?, access);
        headers.insert(header_name(REFRESH_TOKEN_HEADER)?, refresh);

        Ok(res)
    }
}

fn header_name(name: &str) -> AppResult<HeaderName> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| AppError::internal(format!("Invalid header name {}: {}", name, e)))
}

fn header_value(value: &str) -> AppResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| AppError::internal(format!("Token is not a valid header value: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::http::Request;

    async fn extract(request: Request<()>) -> AppResult<TokenHeaders> {
        let (mut parts, _) = request.into_parts();
        TokenHeaders::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_extracts_both_tokens() {
        let request = Request::builder()
            .header("Authorization", "Bearer access")
            .header("RefreshToken", "refresh")
            .body(())
            .unwrap();

        let tokens = extract(request).await.unwrap();
        assert_eq!(tokens.access_token.as_deref(), Some("access"));
        assert_eq!(tokens.refresh_token, "refresh");
    }

    #[tokio::test]
    async fn test_unprefixed_access_token_is_left_to_the_service() {
        let request = Request::builder()
            .header("Authorization", "access")
            .header("RefreshToken", "refresh")
            .body(())
            .unwrap();

        let tokens = extract(request).await.unwrap();
        assert!(tokens.access_token.is_none());
        assert_eq!(tokens.refresh_token, "refresh");
    }

    #[tokio::test]
    async fn test_missing_refresh_header_wins_over_missing_bearer() {
        let request = Request::builder().body(()).unwrap();

        assert!(matches!(extract(request).await, Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_missing_refresh_header_is_invalid() {
        let request = Request::builder()
            .header("Authorization", "Bearer access")
            .body(())
            .unwrap();

        assert!(matches!(extract(request).await, Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_token_pair_writes_headers() {
        let pair = TokenPair {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
        };

        let response = axum::response::IntoResponse::into_response((pair, ()));
        let headers = response.headers();

        assert_eq!(headers.get("authorization").unwrap(), "Bearer access");
        assert_eq!(headers.get("refreshtoken").unwrap(), "refresh");
    }
}
