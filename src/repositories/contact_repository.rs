//! Contact repository for all MongoDB operations related to contacts.
//!
//! Every query is scoped by the owning user's id, so one user can never read
//! or modify another user's contacts.

use async_trait::async_trait;
use futures::TryStreamExt;
use log::{debug, info};
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Collection, Database, IndexModel};

use crate::constants::{
    CODE_CONTACT_EMAIL_EXISTS, CODE_INTERNAL_ERROR, COLLECTION_CONTACTS, ERR_CONTACT_EMAIL_EXISTS,
};
use crate::errors::ApiError;
use crate::models::{Contact, ContactData, ContactFilter};

use super::is_duplicate_key;

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn find_by_id(&self, owner: ObjectId, id: ObjectId) -> Result<Option<Contact>, ApiError>;

    async fn find_by_email(&self, owner: ObjectId, email: &str)
        -> Result<Option<Contact>, ApiError>;

    /// Filtered page of the owner's contacts, oldest first.
    async fn find_many(
        &self,
        owner: ObjectId,
        filter: &ContactFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Contact>, ApiError>;

    /// Every contact of the owner.
    async fn find_all(&self, owner: ObjectId) -> Result<Vec<Contact>, ApiError>;

    async fn insert(&self, contact: Contact) -> Result<Contact, ApiError>;

    /// Replace the editable fields, returning the updated contact.
    async fn update(
        &self,
        owner: ObjectId,
        id: ObjectId,
        data: ContactData,
    ) -> Result<Option<Contact>, ApiError>;

    /// Returns true when a contact was removed.
    async fn delete(&self, owner: ObjectId, id: ObjectId) -> Result<bool, ApiError>;
}

/// MongoDB-backed [`ContactRepository`].
pub struct MongoContactRepository {
    collection: Collection<Contact>,
}

impl MongoContactRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION_CONTACTS),
        }
    }

    /// Create database indexes for the contacts collection.
    ///
    /// - Unique compound index on `user_id` and `email`
    /// - Compound index on `user_id` and `created_at` for listing
    pub async fn create_indexes(&self) -> Result<(), ApiError> {
        info!("Creating database indexes for contacts collection...");

        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "user_id": 1, "email": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "user_id": 1, "created_at": 1 })
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        info!("Contact indexes created successfully");
        Ok(())
    }
}

/// Build the MongoDB query for an owner's contacts matching `filter`.
pub fn filter_document(owner: ObjectId, filter: &ContactFilter) -> Document {
    let mut query = doc! { "user_id": owner };
    if let Some((field, term)) = filter.field() {
        let pattern = mongodb::bson::Regex {
            pattern: regex::escape(term),
            options: "i".to_string(),
        };
        query.insert(field, doc! { "$regex": pattern });
    }
    query
}

fn duplicate_email(err: mongodb::error::Error) -> ApiError {
    if is_duplicate_key(&err) {
        ApiError::bad_request(CODE_CONTACT_EMAIL_EXISTS, ERR_CONTACT_EMAIL_EXISTS)
    } else {
        err.into()
    }
}

#[async_trait]
impl ContactRepository for MongoContactRepository {
    async fn find_by_id(&self, owner: ObjectId, id: ObjectId) -> Result<Option<Contact>, ApiError> {
        debug!("Repository: Finding contact {} of user {}", id, owner);
        Ok(self
            .collection
            .find_one(doc! { "_id": id, "user_id": owner })
            .await?)
    }

    async fn find_by_email(
        &self,
        owner: ObjectId,
        email: &str,
    ) -> Result<Option<Contact>, ApiError> {
        Ok(self
            .collection
            .find_one(doc! { "user_id": owner, "email": email })
            .await?)
    }

    async fn find_many(
        &self,
        owner: ObjectId,
        filter: &ContactFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Contact>, ApiError> {
        let query = filter_document(owner, filter);
        debug!("Repository: Finding contacts with filter: {:?}", query);

        let cursor = self
            .collection
            .find(query)
            .skip(skip)
            .limit(limit as i64)
            .sort(doc! { "created_at": 1, "_id": 1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn find_all(&self, owner: ObjectId) -> Result<Vec<Contact>, ApiError> {
        let cursor = self
            .collection
            .find(doc! { "user_id": owner })
            .sort(doc! { "created_at": 1, "_id": 1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn insert(&self, mut contact: Contact) -> Result<Contact, ApiError> {
        let result = self
            .collection
            .insert_one(&contact)
            .await
            .map_err(duplicate_email)?;

        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            ApiError::internal(CODE_INTERNAL_ERROR, "Inserted contact has no ObjectId")
        })?;
        contact.id = Some(id);
        Ok(contact)
    }

    async fn update(
        &self,
        owner: ObjectId,
        id: ObjectId,
        data: ContactData,
    ) -> Result<Option<Contact>, ApiError> {
        let update = doc! {
            "$set": {
                "first_name": data.first_name,
                "last_name": data.last_name,
                "email": data.email,
                "phone": data.phone,
                "birth_date": data.birth_date.to_string(),
                "bio": data.bio,
            }
        };

        self.collection
            .find_one_and_update(doc! { "_id": id, "user_id": owner }, update)
            .return_document(ReturnDocument::After)
            .await
            .map_err(duplicate_email)
    }

    async fn delete(&self, owner: ObjectId, id: ObjectId) -> Result<bool, ApiError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id, "user_id": owner })
            .await?;
        Ok(result.deleted_count > 0)
    }
}
