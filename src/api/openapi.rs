//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::member_handler;
use crate::domain::Authority;

/// OpenAPI documentation for the member authentication API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Member Auth",
        version = "0.1.0",
        description = "Member signup, login and refresh token rotation"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        member_handler::signup,
        member_handler::login,
        member_handler::reissue,
        member_handler::check_name,
        member_handler::me,
    ),
    components(
        schemas(
            Authority,
            member_handler::SignupRequest,
            member_handler::LoginRequest,
            member_handler::CheckNameRequest,
            member_handler::MemberProfile,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Members", description = "Member registration and session tokens")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token from the Authorization header of /api/members/login"))
                        .build(),
                ),
            );
        }
    }
}
