//! JWT token provider.
//!
//! Signs access/refresh token pairs for a member and reads them back.
//! Two read paths exist on purpose:
//!
//! - [`TokenProvider::validate_token`] is a boolean gate that requires a
//!   good signature and an unexpired token.
//! - [`TokenProvider::extract_identity`] checks the signature but accepts an
//!   expired token, since reissue reads the member from an access token that
//!   has usually run out already.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::Authority;
use crate::errors::{AppError, AppResult};

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Member name
    pub sub: String,
    /// Member authority
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,
    pub iat: i64,
    pub exp: i64,
    /// Unique token id, keeps tokens minted in the same second distinct
    #[serde(default)]
    pub jti: String,
}

/// Identity carried by a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaims {
    pub name: String,
    pub authority: Authority,
}

impl TryFrom<Claims> for IdentityClaims {
    type Error = AppError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        if claims.sub.is_empty() {
            return Err(AppError::MalformedToken);
        }

        let authority = claims
            .auth
            .as_deref()
            .ok_or(AppError::MalformedToken)?
            .parse::<Authority>()
            .map_err(|_| AppError::MalformedToken)?;

        Ok(Self {
            name: claims.sub,
            authority,
        })
    }
}

/// Freshly issued access/refresh pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TokenPair {
    /// Short-lived token for authorizing requests
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Long-lived token used only to obtain a new pair
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub refresh_token: String,
}

/// Creates and reads signed member tokens.
#[derive(Clone)]
pub struct TokenProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("secret", &"[REDACTED]")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .finish()
    }
}

impl TokenProvider {
    pub fn new(secret: &[u8], access_token_ttl: Duration, refresh_token_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            access_token_ttl,
            refresh_token_ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.jwt_secret_bytes(),
            config.access_token_ttl(),
            config.refresh_token_ttl(),
        )
    }

    /// Sign a new access/refresh pair for the member.
    pub fn generate_token_pair(&self, name: &str, authority: Authority) -> AppResult<TokenPair> {
        let now = Utc::now();

        Ok(TokenPair {
            access_token: self.sign(name, authority, now, self.access_token_ttl)?,
            refresh_token: self.sign(name, authority, now, self.refresh_token_ttl)?,
        })
    }

    /// True iff the token is well-formed, correctly signed and unexpired.
    pub fn validate_token(&self, token: &str) -> bool {
        if token.is_empty() {
            return false;
        }

        match decode::<Claims>(token, &self.decoding_key, &Self::validation(true)) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("Token rejected: {:?}", e.kind());
                false
            }
        }
    }

    /// Read the identity from a correctly signed token, expired or not.
    pub fn extract_identity(&self, token: &str) -> AppResult<IdentityClaims> {
        let data = decode::<Claims>(token, &self.decoding_key, &Self::validation(false))
            .map_err(|e| {
                tracing::debug!("Cannot read token claims: {:?}", e.kind());
                AppError::MalformedToken
            })?;

        IdentityClaims::try_from(data.claims)
    }

    /// Read the identity from a token that must still be valid.
    pub fn authenticate(&self, token: &str) -> AppResult<IdentityClaims> {
        let data = decode::<Claims>(token, &self.decoding_key, &Self::validation(true))
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::ExpiredToken,
                _ => AppError::MalformedToken,
            })?;

        IdentityClaims::try_from(data.claims)
    }

    fn sign(
        &self,
        name: &str,
        authority: Authority,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> AppResult<String> {
        let claims = Claims {
            sub: name.to_string(),
            auth: Some(authority.to_string()),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Token signing failed: {}", e)))
    }

    fn validation(check_expiry: bool) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = check_expiry;
        validation
    }
}
