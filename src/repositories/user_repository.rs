//! User repository for all MongoDB operations related to users.

use async_trait::async_trait;
use log::{debug, info};
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Collection, Database, IndexModel};

use crate::constants::{
    CODE_ACCOUNT_EXISTS, CODE_INTERNAL_ERROR, COLLECTION_USERS, ERR_ACCOUNT_EXISTS,
};
use crate::errors::ApiError;
use crate::models::User;
use crate::utils::mask_email;

use super::is_duplicate_key;

/// Storage operations needed by the auth, user and avatar flows.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by email address (case-insensitive).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;

    /// Insert a new, unconfirmed user.
    async fn create(
        &self,
        email: &str,
        password_hash: &str,
        avatar: Option<String>,
    ) -> Result<User, ApiError>;

    /// Mark the user's email as confirmed.
    async fn confirm_email(&self, email: &str) -> Result<(), ApiError>;

    /// Store or clear the user's current refresh token.
    async fn update_token(&self, id: ObjectId, token: Option<&str>) -> Result<(), ApiError>;

    /// Set the avatar URL and return the updated user.
    async fn update_avatar(&self, email: &str, avatar_url: &str)
        -> Result<Option<User>, ApiError>;
}

/// MongoDB-backed [`UserRepository`].
pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    /// Create a new MongoUserRepository instance.
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION_USERS),
        }
    }

    /// Create database indexes for commonly queried fields.
    ///
    /// Called once during application startup; emails are unique.
    pub async fn create_indexes(&self) -> Result<(), ApiError> {
        info!("Creating database indexes for users collection...");

        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection.create_index(index).await?;
        info!("User indexes created successfully");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        debug!("Repository: Finding user by email: {}", mask_email(email));
        Ok(self
            .collection
            .find_one(doc! { "email": email.to_lowercase() })
            .await?)
    }

    async fn create(
        &self,
        email: &str,
        password_hash: &str,
        avatar: Option<String>,
    ) -> Result<User, ApiError> {
        let mut user = User {
            id: None,
            email: email.to_lowercase(),
            password_hash: password_hash.to_string(),
            avatar,
            refresh_token: None,
            confirmed: false,
            created_at: mongodb::bson::DateTime::now(),
        };

        let result = self.collection.insert_one(&user).await.map_err(|e| {
            if is_duplicate_key(&e) {
                ApiError::conflict(CODE_ACCOUNT_EXISTS, ERR_ACCOUNT_EXISTS)
            } else {
                e.into()
            }
        })?;

        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            ApiError::internal(CODE_INTERNAL_ERROR, "Inserted user has no ObjectId")
        })?;
        user.id = Some(id);
        Ok(user)
    }

    async fn confirm_email(&self, email: &str) -> Result<(), ApiError> {
        debug!("Repository: Confirming email: {}", mask_email(email));
        self.collection
            .update_one(
                doc! { "email": email.to_lowercase() },
                doc! { "$set": { "confirmed": true } },
            )
            .await?;
        Ok(())
    }

    async fn update_token(&self, id: ObjectId, token: Option<&str>) -> Result<(), ApiError> {
        self.collection
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "refresh_token": token } },
            )
            .await?;
        Ok(())
    }

    async fn update_avatar(
        &self,
        email: &str,
        avatar_url: &str,
    ) -> Result<Option<User>, ApiError> {
        debug!("Repository: Updating avatar for user: {}", mask_email(email));
        Ok(self
            .collection
            .find_one_and_update(
                doc! { "email": email.to_lowercase() },
                doc! { "$set": { "avatar": avatar_url } },
            )
            .return_document(ReturnDocument::After)
            .await?)
    }
}
