//! Contact response models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Contact, User, UserResponse};

/// Contact data returned in API responses
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
pub struct ContactResponse {
    #[schema(example = "65a1f0c2e4b0a1b2c3d4e5f6")]
    pub id: String,
    #[schema(example = "Jane")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[schema(example = "+380 50 123 4567")]
    pub phone: String,
    #[schema(value_type = String, format = Date, example = "1990-01-15")]
    pub birth_date: NaiveDate,
    #[schema(example = "Met at RustConf")]
    pub bio: String,
    /// The user owning this contact
    pub owner: UserResponse,
}

impl ContactResponse {
    pub fn new(contact: Contact, owner: &User) -> Self {
        Self {
            id: contact.id.map(|id| id.to_hex()).unwrap_or_default(),
            first_name: contact.first_name,
            last_name: contact.last_name,
            email: contact.email,
            phone: contact.phone,
            birth_date: contact.birth_date,
            bio: contact.bio,
            owner: owner.clone().into(),
        }
    }

    pub fn list(contacts: Vec<Contact>, owner: &User) -> Vec<Self> {
        contacts
            .into_iter()
            .map(|contact| Self::new(contact, owner))
            .collect()
    }
}
