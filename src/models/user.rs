use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// User document stored in MongoDB
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub confirmed: bool,
    pub created_at: mongodb::bson::DateTime,
}

impl User {
    /// Hex representation of the user's id, empty for unsaved users.
    pub fn id_hex(&self) -> String {
        self.id.map(|id| id.to_hex()).unwrap_or_default()
    }
}

/// Authenticated user attached to a request by the auth middleware.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    /// Raw access token presented with the request
    pub token: String,
    /// Expiration timestamp of that token
    pub token_exp: i64,
}
