//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::api::headers::bearer_token;
use crate::api::AppState;
use crate::domain::Authority;
use crate::errors::AppError;

/// Authenticated member extracted from the access token
#[derive(Clone, Debug)]
pub struct CurrentMember {
    pub name: String,
    pub authority: Authority,
}

/// JWT authentication middleware.
///
/// Requires an unexpired access token in the Authorization header and
/// injects the CurrentMember into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::Unauthorized)?;

    let identity = state.member_service.authenticate(token)?;

    request.extensions_mut().insert(CurrentMember {
        name: identity.name,
        authority: identity.authority,
    });

    Ok(next.run(request).await)
}
