use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::models::{
    ContactRequest, ContactResponse, ErrorResponse, LoginForm, MessageResponse, RequestEmail,
    SignupRequest, SignupResponse, TokenResponse, UserResponse,
};

/// OpenAPI documentation for the Notebook API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Notebook API",
        version = "0.1.0",
        description = "Personal contacts notebook with JWT authentication, email verification and avatars.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server")
    ),
    tags(
        (name = "Health", description = "Liveness and database checks"),
        (name = "Authentication", description = "Signup, login, token refresh, email verification and logout"),
        (name = "Users", description = "Current user profile and avatar"),
        (name = "Contacts", description = "Contacts owned by the current user")
    ),
    paths(
        crate::handlers::root,
        crate::handlers::database_checker,
        crate::handlers::signup,
        crate::handlers::login,
        crate::handlers::refresh_token,
        crate::handlers::confirmed_email,
        crate::handlers::request_email,
        crate::handlers::logout,
        crate::handlers::get_current_user,
        crate::handlers::update_avatar,
        crate::handlers::create_contact,
        crate::handlers::get_contacts,
        crate::handlers::get_week_to_birthday,
        crate::handlers::get_contact,
        crate::handlers::update_contact,
        crate::handlers::delete_contact
    ),
    components(
        schemas(
            SignupRequest,
            LoginForm,
            RequestEmail,
            ContactRequest,
            UserResponse,
            SignupResponse,
            TokenResponse,
            ContactResponse,
            MessageResponse,
            ErrorResponse
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Security configuration for Bearer token authentication
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
                        .description(Some(
                            "Access token obtained from the /api/auth/login endpoint",
                        ))
                        .build(),
                ),
            );
        }
    }
}
