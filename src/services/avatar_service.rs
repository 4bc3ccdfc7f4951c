//! Avatar uploads: multipart reading, image hosting and persisting the URL.

use std::path::PathBuf;
use std::sync::Arc;

use actix_multipart::Multipart;
use async_trait::async_trait;
use chrono::Utc;
use futures::StreamExt;
use log::{error, info, warn};
use serde::Deserialize;
use sha1::{Digest, Sha1};

use crate::config::CloudinaryConfig;
use crate::constants::{
    CODE_FILE_UPLOAD_FAILED, CODE_INTERNAL_ERROR, ERR_AVATAR_HOST_FAILED,
    ERR_FAILED_FETCH_USER, ERR_FAILED_PROCESS_UPLOAD, ERR_FAILED_READ_FILE, ERR_FAILED_SAVE_FILE,
    ERR_NO_AVATAR_FILE,
};
use crate::errors::ApiError;
use crate::models::User;
use crate::repositories::UserRepository;
use crate::services::user_cache::UserCache;
use crate::utils::mask_email;
use crate::validators::{
    get_extension_from_content_type, validate_avatar_content_type, validate_avatar_size,
};

/// Multipart field carrying the image.
pub const AVATAR_FIELD: &str = "file";

/// A validated image read from the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarUpload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl AvatarUpload {
    pub fn extension(&self) -> &'static str {
        get_extension_from_content_type(&self.content_type)
    }
}

/// Read the `file` field of a multipart payload, enforcing type and size limits.
pub async fn read_upload(payload: &mut Multipart) -> Result<AvatarUpload, ApiError> {
    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| {
            warn!("Failed to process multipart field: {}", e);
            ApiError::bad_request(CODE_FILE_UPLOAD_FAILED, ERR_FAILED_PROCESS_UPLOAD)
        })?;

        let field_name = field
            .content_disposition()
            .and_then(|cd| cd.get_name())
            .unwrap_or("");
        if field_name != AVATAR_FIELD {
            continue;
        }

        let content_type = field.content_type().map(|ct| ct.essence_str().to_string());
        validate_avatar_content_type(content_type.as_deref())?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|e| {
                warn!("Failed to read chunk: {}", e);
                ApiError::bad_request(CODE_FILE_UPLOAD_FAILED, ERR_FAILED_READ_FILE)
            })?;
            validate_avatar_size(bytes.len() + data.len())?;
            bytes.extend_from_slice(&data);
        }

        return Ok(AvatarUpload {
            content_type: content_type.unwrap_or_default(),
            bytes,
        });
    }

    Err(ApiError::bad_request(CODE_FILE_UPLOAD_FAILED, ERR_NO_AVATAR_FILE))
}

/// Destination for avatar images; returns the public URL of the stored image.
#[async_trait]
pub trait AvatarStore: Send + Sync {
    async fn store(&self, user_id: &str, upload: AvatarUpload) -> Result<String, ApiError>;
}

#[derive(Debug, Deserialize)]
struct CloudinaryUploadResponse {
    version: u64,
}

/// Signed uploads to Cloudinary. Each user has one image, `notebook/{user_id}`.
pub struct CloudinaryAvatarStore {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryAvatarStore {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// SHA-1 signature over the sorted upload parameters followed by the API secret.
    pub fn signature(params: &str, api_secret: &str) -> String {
        let mut hasher = Sha1::new();
        hasher.update(params.as_bytes());
        hasher.update(api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// 250x250 cropped delivery URL pinned to an uploaded version.
    pub fn delivery_url(cloud_name: &str, version: u64, public_id: &str) -> String {
        format!(
            "https://res.cloudinary.com/{}/image/upload/c_fill,h_250,w_250/v{}/{}",
            cloud_name, version, public_id
        )
    }

    fn upload_url(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.config.cloud_name
        )
    }
}

fn host_failed() -> ApiError {
    ApiError::internal(CODE_FILE_UPLOAD_FAILED, ERR_AVATAR_HOST_FAILED)
}

#[async_trait]
impl AvatarStore for CloudinaryAvatarStore {
    async fn store(&self, user_id: &str, upload: AvatarUpload) -> Result<String, ApiError> {
        let public_id = format!("notebook/{}", user_id);
        let timestamp = Utc::now().timestamp().to_string();
        let signature = Self::signature(
            &format!(
                "overwrite=true&public_id={}&timestamp={}",
                public_id, timestamp
            ),
            &self.config.api_secret,
        );

        let file_name = format!("{}.{}", user_id, upload.extension());
        let part = reqwest::multipart::Part::bytes(upload.bytes)
            .file_name(file_name)
            .mime_str(&upload.content_type)
            .map_err(|e| {
                warn!("Rejected avatar content type: {}", e);
                host_failed()
            })?;

        let form = reqwest::multipart::Form::new()
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("public_id", public_id.clone())
            .text("overwrite", "true")
            .text("signature", signature)
            .part("file", part);

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!("Cloudinary request failed: {}", e);
                host_failed()
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Cloudinary upload rejected with {}: {}", status, body);
            return Err(host_failed());
        }

        let uploaded: CloudinaryUploadResponse = response.json().await.map_err(|e| {
            error!("Unexpected Cloudinary response: {}", e);
            host_failed()
        })?;

        Ok(Self::delivery_url(
            &self.config.cloud_name,
            uploaded.version,
            &public_id,
        ))
    }
}

/// Stores avatars on local disk, served under `/uploads`.
pub struct LocalAvatarStore {
    upload_dir: PathBuf,
}

impl LocalAvatarStore {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }
}

#[async_trait]
impl AvatarStore for LocalAvatarStore {
    async fn store(&self, user_id: &str, upload: AvatarUpload) -> Result<String, ApiError> {
        let save_failed = |e: std::io::Error| {
            warn!("Failed to save avatar: {}", e);
            ApiError::internal(CODE_INTERNAL_ERROR, ERR_FAILED_SAVE_FILE)
        };

        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(save_failed)?;

        let filename = format!("{}.{}", user_id, upload.extension());
        tokio::fs::write(self.upload_dir.join(&filename), &upload.bytes)
            .await
            .map_err(save_failed)?;

        Ok(format!("/uploads/{}", filename))
    }
}

/// Service for avatar operations.
pub struct AvatarService {
    store: Arc<dyn AvatarStore>,
    users: Arc<dyn UserRepository>,
    cache: Arc<dyn UserCache>,
}

impl AvatarService {
    pub fn new(
        store: Arc<dyn AvatarStore>,
        users: Arc<dyn UserRepository>,
        cache: Arc<dyn UserCache>,
    ) -> Self {
        Self {
            store,
            users,
            cache,
        }
    }

    /// Store the image and point the user's avatar at it.
    pub async fn update_avatar(&self, user: &User, upload: AvatarUpload) -> Result<User, ApiError> {
        info!("Updating avatar for user: {}", mask_email(&user.email));

        let url = self.store.store(&user.id_hex(), upload).await?;
        let updated = self
            .users
            .update_avatar(&user.email, &url)
            .await?
            .ok_or_else(|| ApiError::internal(CODE_INTERNAL_ERROR, ERR_FAILED_FETCH_USER))?;
        self.cache.invalidate(&user.email).await;

        Ok(updated)
    }
}
