//! Error code constants for API responses.
//!
//! These codes provide a machine-readable identifier for each error type,
//! making it easier for API clients to handle errors programmatically.

// Validation errors
pub const CODE_VALIDATION_FAILED: &str = "VALIDATION_FAILED";

// Authentication errors
pub const CODE_INVALID_TOKEN: &str = "INVALID_TOKEN";
pub const CODE_INVALID_SCOPE: &str = "INVALID_SCOPE";
pub const CODE_INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
pub const CODE_EMAIL_NOT_CONFIRMED: &str = "EMAIL_NOT_CONFIRMED";
pub const CODE_INVALID_EMAIL_TOKEN: &str = "INVALID_EMAIL_TOKEN";
pub const CODE_VERIFICATION_FAILED: &str = "VERIFICATION_FAILED";

// User errors
pub const CODE_ACCOUNT_EXISTS: &str = "ACCOUNT_EXISTS";

// Contact errors
pub const CODE_CONTACT_NOT_FOUND: &str = "CONTACT_NOT_FOUND";
pub const CODE_CONTACT_EMAIL_EXISTS: &str = "CONTACT_EMAIL_EXISTS";
pub const CODE_INVALID_CONTACT_ID: &str = "INVALID_CONTACT_ID";

// Access errors
pub const CODE_BANNED: &str = "BANNED";

// File errors
pub const CODE_INVALID_FILE_TYPE: &str = "INVALID_FILE_TYPE";
pub const CODE_FILE_TOO_LARGE: &str = "FILE_TOO_LARGE";
pub const CODE_FILE_UPLOAD_FAILED: &str = "FILE_UPLOAD_FAILED";

// Generic errors
pub const CODE_INTERNAL_ERROR: &str = "INTERNAL_ERROR";
pub const CODE_DATABASE_UNAVAILABLE: &str = "DATABASE_UNAVAILABLE";
