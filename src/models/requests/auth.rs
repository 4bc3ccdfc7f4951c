//! Authentication request models.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Request payload for user registration
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    /// User's email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Password (6-64 characters)
    #[validate(length(
        min = 6,
        max = 64,
        message = "Password must be between 6 and 64 characters"
    ))]
    #[schema(example = "secret123")]
    pub password: String,
}

/// OAuth2 password-flow login form; `username` holds the email
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginForm {
    /// User's email address
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "user@example.com")]
    pub username: String,
    /// User's password
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "secret123")]
    pub password: String,
}

/// Request payload for re-sending the confirmation email
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RequestEmail {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
}
