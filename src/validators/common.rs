//! Common validation utilities and helpers.

use validator::ValidationErrors;

use crate::constants::{
    CODE_FILE_TOO_LARGE, CODE_INVALID_FILE_TYPE, DEFAULT_LIMIT, ERR_FILE_TOO_LARGE,
    ERR_INVALID_FILE_TYPE, MAX_LIMIT,
};
use crate::errors::ApiError;

/// Allowed image content types for avatar uploads.
pub const ALLOWED_AVATAR_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Maximum file size for avatar uploads (5MB).
pub const MAX_AVATAR_SIZE: usize = 5 * 1024 * 1024;

/// Convert validator errors to ApiError::ValidationError.
///
/// This helper function extracts error messages from ValidationErrors
/// and converts them into a format suitable for API responses.
///
/// # Example
/// ```ignore
/// body.validate().map_err(validation_errors_to_api_error)?;
/// ```
pub fn validation_errors_to_api_error(e: ValidationErrors) -> ApiError {
    let mut errors: Vec<String> = e
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .clone()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field))
            })
        })
        .collect();
    errors.sort();
    ApiError::validation(errors)
}

/// Resolve `skip`/`limit` query values, applying defaults and bounds.
///
/// A zero limit is rejected: MongoDB reads `limit(0)` as "no limit".
pub fn validate_pagination(skip: Option<u64>, limit: Option<u64>) -> Result<(u64, u64), ApiError> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    if limit == 0 {
        return Err(ApiError::validation(vec![
            "Limit must be at least 1".to_string(),
        ]));
    }
    if limit > MAX_LIMIT {
        return Err(ApiError::validation(vec![format!(
            "Limit must be at most {}",
            MAX_LIMIT
        )]));
    }
    Ok((skip.unwrap_or(0), limit))
}

/// Validate avatar content type.
///
/// Returns an error if the content type is not an allowed image type.
pub fn validate_avatar_content_type(content_type: Option<&str>) -> Result<(), ApiError> {
    match content_type {
        Some(ct) if ALLOWED_AVATAR_TYPES.iter().any(|t| ct.starts_with(t)) => Ok(()),
        _ => Err(ApiError::bad_request(
            CODE_INVALID_FILE_TYPE,
            ERR_INVALID_FILE_TYPE,
        )),
    }
}

/// Get file extension from content type.
pub fn get_extension_from_content_type(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "jpg",
    }
}

/// Validate avatar file size.
pub fn validate_avatar_size(size: usize) -> Result<(), ApiError> {
    if size > MAX_AVATAR_SIZE {
        return Err(ApiError::bad_request(CODE_FILE_TOO_LARGE, ERR_FILE_TOO_LARGE));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_bounds() {
        assert_eq!(validate_pagination(None, None).unwrap(), (0, 10));
        assert_eq!(validate_pagination(Some(5), Some(100)).unwrap(), (5, 100));
        assert!(matches!(
            validate_pagination(None, Some(101)),
            Err(ApiError::ValidationError { .. })
        ));
        assert!(matches!(
            validate_pagination(Some(3), Some(0)),
            Err(ApiError::ValidationError { .. })
        ));
    }

    #[test]
    fn avatar_content_types() {
        assert!(validate_avatar_content_type(Some("image/png")).is_ok());
        assert!(validate_avatar_content_type(Some("image/jpeg; charset=binary")).is_ok());
        assert!(validate_avatar_content_type(Some("application/pdf")).is_err());
        assert!(validate_avatar_content_type(None).is_err());
        assert_eq!(get_extension_from_content_type("image/webp"), "webp");
        assert_eq!(get_extension_from_content_type("image/jpeg"), "jpg");
    }

    #[test]
    fn avatar_size_limit() {
        assert!(validate_avatar_size(MAX_AVATAR_SIZE).is_ok());
        assert!(validate_avatar_size(MAX_AVATAR_SIZE + 1).is_err());
    }
}
