//! Generic API response models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use crate::errors::ErrorResponse;

/// Plain message response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Email confirmed")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
