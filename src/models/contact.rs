use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Contact document stored in MongoDB, always owned by a single user
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Contact {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: NaiveDate,
    pub bio: String,
    pub created_at: mongodb::bson::DateTime,
}

/// Editable contact fields, shared by create and update
#[derive(Debug, Clone, PartialEq)]
pub struct ContactData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: NaiveDate,
    pub bio: String,
}

impl Contact {
    pub fn new(user_id: ObjectId, data: ContactData) -> Self {
        Self {
            id: None,
            user_id,
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            phone: data.phone,
            birth_date: data.birth_date,
            bio: data.bio,
            created_at: mongodb::bson::DateTime::now(),
        }
    }

    /// Copy editable fields from `data`, keeping identity and ownership.
    #[cfg(test)]
    pub fn apply(&mut self, data: ContactData) {
        self.first_name = data.first_name;
        self.last_name = data.last_name;
        self.email = data.email;
        self.phone = data.phone;
        self.birth_date = data.birth_date;
        self.bio = data.bio;
    }
}

/// Search applied when listing contacts. Only one field is matched at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContactFilter {
    #[default]
    All,
    Email(String),
    FirstName(String),
    LastName(String),
}

impl ContactFilter {
    /// Pick the filter from optional query values.
    ///
    /// Precedence is email, then first name, then last name; blank values are ignored.
    pub fn from_query(
        email: Option<&str>,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Self {
        let present = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        if let Some(email) = present(email) {
            ContactFilter::Email(email)
        } else if let Some(first_name) = present(first_name) {
            ContactFilter::FirstName(first_name)
        } else if let Some(last_name) = present(last_name) {
            ContactFilter::LastName(last_name)
        } else {
            ContactFilter::All
        }
    }

    /// Field name and search term, if the filter restricts results.
    pub fn field(&self) -> Option<(&'static str, &str)> {
        match self {
            ContactFilter::All => None,
            ContactFilter::Email(term) => Some(("email", term)),
            ContactFilter::FirstName(term) => Some(("first_name", term)),
            ContactFilter::LastName(term) => Some(("last_name", term)),
        }
    }

    /// Case-insensitive substring match against a contact.
    #[cfg(test)]
    pub fn matches(&self, contact: &Contact) -> bool {
        let (value, term) = match self {
            ContactFilter::All => return true,
            ContactFilter::Email(term) => (&contact.email, term),
            ContactFilter::FirstName(term) => (&contact.first_name, term),
            ContactFilter::LastName(term) => (&contact.last_name, term),
        };
        value.to_lowercase().contains(&term.to_lowercase())
    }
}
