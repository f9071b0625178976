//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, mobile_handler};
use crate::domain::UserResponse;
use crate::services::TokenResponse;
use crate::types::MessageResponse;

/// OpenAPI documentation for the learner account API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Learner Retirement API",
        version = "0.1.0",
        description = "Mobile account endpoints: profile lookup and self-service account deactivation",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::login,
        // Mobile endpoints
        mobile_handler::get_user_detail,
        mobile_handler::deactivate_logout,
    ),
    components(
        schemas(
            UserResponse,
            MessageResponse,
            auth_handler::LoginRequest,
            TokenResponse,
            mobile_handler::DeactivateRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login"),
        (name = "Mobile", description = "Mobile account operations")
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
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_mobile_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/auth/login"));
        assert!(paths.contains_key("/api/mobile/v1/users/{username}/"));
        assert!(paths.contains_key("/api/mobile/v1/users/{username}/deactivate_logout/"));
    }
}
