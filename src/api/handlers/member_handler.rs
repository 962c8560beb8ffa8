//! Member handlers - signup, login, reissue.

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::headers::TokenHeaders;
use crate::api::middleware::{auth_middleware, CurrentMember};
use crate::api::AppState;
use crate::domain::Authority;
use crate::errors::AppResult;
use crate::security::TokenPair;
use crate::types::ApiResponse;

/// Member registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    /// Unique member name
    #[validate(length(min = 1, max = 30, message = "Name must be 1 to 30 characters"))]
    #[schema(example = "alice", min_length = 1, max_length = 30)]
    pub name: String,
    /// Member password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
}

/// Member login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 30, message = "Name must be 1 to 30 characters"))]
    #[schema(example = "alice")]
    pub name: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Name availability request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CheckNameRequest {
    #[validate(length(min = 1, max = 30, message = "Name must be 1 to 30 characters"))]
    #[schema(example = "alice")]
    pub name: String,
}

/// The authenticated member
#[derive(Debug, Serialize, ToSchema)]
pub struct MemberProfile {
    pub name: String,
    pub authority: Authority,
}

type MessageResponse = Json<ApiResponse<()>>;

/// Create member routes
pub fn member_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/reissue", post(reissue))
        .route("/check-name", post(check_name))
        .route(
            "/me",
            get(me).route_layer(middleware::from_fn_with_state(state, auth_middleware)),
        )
}

/// Register a new member
#[utoipa::path(
    post,
    path = "/api/members/signup",
    tag = "Members",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Member registered"),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Name already taken")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> AppResult<MessageResponse> {
    state
        .member_service
        .signup(payload.name, payload.password)
        .await?;

    Ok(Json(ApiResponse::message("Signup successful")))
}

/// Log in and receive tokens in the response headers
#[utoipa::path(
    post,
    path = "/api/members/login",
    tag = "Members",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", headers(
            ("Authorization" = String, description = "Bearer access token"),
            ("RefreshToken" = String, description = "Refresh token")
        )),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid name or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<(TokenPair, MessageResponse)> {
    let tokens = state
        .member_service
        .login(payload.name, payload.password)
        .await?;

    Ok((tokens, Json(ApiResponse::message("Login successful"))))
}

/// Exchange the current refresh token for a new token pair
#[utoipa::path(
    post,
    path = "/api/members/reissue",
    tag = "Members",
    params(
        ("Authorization" = String, Header, description = "Bearer access token, may be expired"),
        ("RefreshToken" = String, Header, description = "Current refresh token")
    ),
    responses(
        (status = 200, description = "Tokens reissued", headers(
            ("Authorization" = String, description = "Bearer access token"),
            ("RefreshToken" = String, description = "Refresh token")
        )),
        (status = 401, description = "Invalid, mismatched or unknown session token")
    )
)]
pub async fn reissue(
    State(state): State<AppState>,
    presented: TokenHeaders,
) -> AppResult<(TokenPair, MessageResponse)> {
    // An absent access token fails the claims read as malformed, after the
    // refresh token has been checked
    let access_token = presented.access_token.unwrap_or_default();
    let tokens = state
        .member_service
        .reissue(&access_token, &presented.refresh_token)
        .await?;

    Ok((tokens, Json(ApiResponse::message("Token reissued"))))
}

/// Check whether a name is still available
#[utoipa::path(
    post,
    path = "/api/members/check-name",
    tag = "Members",
    request_body = CheckNameRequest,
    responses(
        (status = 200, description = "Name is available"),
        (status = 409, description = "Name already taken")
    )
)]
pub async fn check_name(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CheckNameRequest>,
) -> AppResult<MessageResponse> {
    state.member_service.check_name(&payload.name).await?;

    Ok(Json(ApiResponse::message("Name is available")))
}

/// Get the member behind the access token
#[utoipa::path(
    get,
    path = "/api/members/me",
    tag = "Members",
    responses(
        (status = 200, description = "Current member", body = MemberProfile),
        (status = 401, description = "Missing, expired or invalid access token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(Extension(member): Extension<CurrentMember>) -> Json<ApiResponse<MemberProfile>> {
    Json(ApiResponse::success(MemberProfile {
        name: member.name,
        authority: member.authority,
    }))
}
