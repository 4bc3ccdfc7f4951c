//! Contact request models.

use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::ContactData;
use crate::validators::validate_phone;

/// Request payload for creating or replacing a contact
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ContactRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[validate(length(
        min = 1,
        max = 50,
        message = "First name must be between 1 and 50 characters"
    ))]
    #[schema(example = "Jane")]
    pub first_name: String,
    #[validate(length(
        min = 1,
        max = 50,
        message = "Last name must be between 1 and 50 characters"
    ))]
    #[schema(example = "Doe")]
    pub last_name: String,
    #[validate(
        length(min = 1, max = 20, message = "Phone must be between 1 and 20 characters"),
        custom(function = "validate_phone")
    )]
    #[schema(example = "+380 50 123 4567")]
    pub phone: String,
    /// Birth date in YYYY-MM-DD format
    #[schema(value_type = String, format = Date, example = "1990-01-15")]
    pub birth_date: NaiveDate,
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    #[schema(example = "Met at RustConf")]
    pub bio: String,
}

impl From<ContactRequest> for ContactData {
    fn from(req: ContactRequest) -> Self {
        Self {
            first_name: req.first_name.trim().to_string(),
            last_name: req.last_name.trim().to_string(),
            email: req.email.trim().to_string(),
            phone: req.phone.trim().to_string(),
            birth_date: req.birth_date,
            bio: req.bio,
        }
    }
}

/// Query parameters for listing contacts
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ContactListQuery {
    /// Number of records to skip (default 0)
    pub skip: Option<u64>,
    /// Maximum number of records (default 10, max 100)
    pub limit: Option<u64>,
    /// Case-insensitive substring of the email
    #[validate(length(max = 255, message = "Search term must be at most 255 characters"))]
    pub email: Option<String>,
    /// Case-insensitive substring of the first name
    #[validate(length(max = 255, message = "Search term must be at most 255 characters"))]
    pub first_name: Option<String>,
    /// Case-insensitive substring of the last name
    #[validate(length(max = 255, message = "Search term must be at most 255 characters"))]
    pub last_name: Option<String>,
}

/// Query parameters for plain pagination
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// Number of records to skip (default 0)
    pub skip: Option<u64>,
    /// Maximum number of records (default 10, max 100)
    pub limit: Option<u64>,
}
