//! User-related response models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::{MSG_USER_CREATED, TOKEN_TYPE_BEARER};
use crate::models::User;

/// User data returned in API responses (without sensitive fields)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
pub struct UserResponse {
    /// User's unique identifier
    #[schema(example = "507f1f77bcf86cd799439011")]
    pub id: String,
    /// User's email address
    #[schema(example = "user@example.com")]
    pub email: String,
    /// URL of the user's avatar image
    #[schema(example = "https://www.gravatar.com/avatar/b58996c504c5638798eb6b511e6f49af")]
    pub avatar: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id_hex(),
            email: user.email,
            avatar: user.avatar,
        }
    }
}

/// Response for a successful signup
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SignupResponse {
    pub user: UserResponse,
    #[schema(example = "User successfully created. Check your email for confirmation.")]
    pub detail: String,
}

impl SignupResponse {
    pub fn new(user: User) -> Self {
        Self {
            user: user.into(),
            detail: MSG_USER_CREATED.to_string(),
        }
    }
}

/// Access/refresh token pair
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct TokenResponse {
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub refresh_token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
        }
    }
}
