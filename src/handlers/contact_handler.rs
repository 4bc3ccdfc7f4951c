//! Contact CRUD and search handlers. Every operation is limited to the
//! authenticated user's own contacts.

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Local;
use validator::Validate;

use crate::errors::ApiError;
use crate::middleware::require_user;
use crate::models::{ContactFilter, ContactListQuery, ContactRequest, ContactResponse, PaginationQuery};
use crate::services::ContactService;
use crate::validators::{validate_pagination, validation_errors_to_api_error};

/// Create a contact
#[utoipa::path(
    post,
    path = "/api/contacts",
    tag = "Contacts",
    request_body = ContactRequest,
    responses(
        (status = 201, description = "Contact created", body = ContactResponse),
        (status = 400, description = "Validation error or email already registered", body = crate::models::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_contact(
    req: HttpRequest,
    contact_service: web::Data<ContactService>,
    body: web::Json<ContactRequest>,
) -> Result<HttpResponse, ApiError> {
    let current = require_user(&req)?;
    body.validate().map_err(validation_errors_to_api_error)?;

    let contact = contact_service
        .create(&current.user, body.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(ContactResponse::new(contact, &current.user)))
}

/// List contacts, optionally searching one field
///
/// Only the first of `email`, `first_name`, `last_name` that is present is applied.
#[utoipa::path(
    get,
    path = "/api/contacts",
    tag = "Contacts",
    params(ContactListQuery),
    responses(
        (status = 200, description = "Contacts", body = Vec<ContactResponse>),
        (status = 400, description = "Invalid query", body = crate::models::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_contacts(
    req: HttpRequest,
    contact_service: web::Data<ContactService>,
    query: web::Query<ContactListQuery>,
) -> Result<HttpResponse, ApiError> {
    let current = require_user(&req)?;
    query.validate().map_err(validation_errors_to_api_error)?;
    let (skip, limit) = validate_pagination(query.skip, query.limit)?;

    let filter = ContactFilter::from_query(
        query.email.as_deref(),
        query.first_name.as_deref(),
        query.last_name.as_deref(),
    );
    let contacts = contact_service
        .list(&current.user, &filter, skip, limit)
        .await?;
    Ok(HttpResponse::Ok().json(ContactResponse::list(contacts, &current.user)))
}

/// Contacts with a birthday in the next seven days
#[utoipa::path(
    get,
    path = "/api/contacts/week_to_birthday",
    tag = "Contacts",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Contacts ordered by upcoming birthday", body = Vec<ContactResponse>),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_week_to_birthday(
    req: HttpRequest,
    contact_service: web::Data<ContactService>,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, ApiError> {
    let current = require_user(&req)?;
    let (skip, limit) = validate_pagination(query.skip, query.limit)?;

    let today = Local::now().date_naive();
    let contacts = contact_service
        .upcoming_birthdays(&current.user, today, skip, limit)
        .await?;
    Ok(HttpResponse::Ok().json(ContactResponse::list(contacts, &current.user)))
}

/// Get a contact by ID
#[utoipa::path(
    get,
    path = "/api/contacts/{id}",
    tag = "Contacts",
    params(
        ("id" = String, Path, description = "Contact ID")
    ),
    responses(
        (status = 200, description = "Contact", body = ContactResponse),
        (status = 400, description = "Invalid ID format", body = crate::models::ErrorResponse),
        (status = 404, description = "Not found", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_contact(
    req: HttpRequest,
    contact_service: web::Data<ContactService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let current = require_user(&req)?;
    let contact = contact_service.get(&current.user, &path).await?;
    Ok(HttpResponse::Ok().json(ContactResponse::new(contact, &current.user)))
}

/// Replace a contact
#[utoipa::path(
    put,
    path = "/api/contacts/{id}",
    tag = "Contacts",
    params(
        ("id" = String, Path, description = "Contact ID")
    ),
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Contact updated", body = ContactResponse),
        (status = 400, description = "Validation error or email already registered", body = crate::models::ErrorResponse),
        (status = 404, description = "Not found", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_contact(
    req: HttpRequest,
    contact_service: web::Data<ContactService>,
    path: web::Path<String>,
    body: web::Json<ContactRequest>,
) -> Result<HttpResponse, ApiError> {
    let current = require_user(&req)?;
    body.validate().map_err(validation_errors_to_api_error)?;

    let contact = contact_service
        .update(&current.user, &path, body.into_inner().into())
        .await?;
    Ok(HttpResponse::Ok().json(ContactResponse::new(contact, &current.user)))
}

/// Delete a contact
#[utoipa::path(
    delete,
    path = "/api/contacts/{id}",
    tag = "Contacts",
    params(
        ("id" = String, Path, description = "Contact ID")
    ),
    responses(
        (status = 204, description = "Contact deleted"),
        (status = 400, description = "Invalid ID format", body = crate::models::ErrorResponse),
        (status = 404, description = "Not found", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_contact(
    req: HttpRequest,
    contact_service: web::Data<ContactService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let current = require_user(&req)?;
    contact_service.remove(&current.user, &path).await?;
    Ok(HttpResponse::NoContent().finish())
}
