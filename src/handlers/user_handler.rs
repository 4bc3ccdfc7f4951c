//! Handlers for the authenticated user's own profile.

use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse};

use crate::errors::ApiError;
use crate::middleware::require_user;
use crate::models::UserResponse;
use crate::services::avatar_service::read_upload;
use crate::services::AvatarService;

/// Get the currently authenticated user
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_current_user(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    let current = require_user(&req)?;
    Ok(HttpResponse::Ok().json(UserResponse::from(current.user)))
}

/// Replace the current user's avatar
///
/// Accepts a JPEG, PNG, GIF or WebP image of at most 5MB in the `file` field.
#[utoipa::path(
    patch,
    path = "/api/users/avatar",
    tag = "Users",
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "Avatar image in the `file` field"),
    responses(
        (status = 200, description = "Avatar updated", body = UserResponse),
        (status = 400, description = "Invalid file type or size", body = crate::models::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_avatar(
    req: HttpRequest,
    avatar_service: web::Data<AvatarService>,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let current = require_user(&req)?;
    let upload = read_upload(&mut payload).await?;

    let user = avatar_service.update_avatar(&current.user, upload).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
