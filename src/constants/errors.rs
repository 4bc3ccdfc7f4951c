//! Error message constants used throughout the application.

// Authentication errors
pub const ERR_INVALID_AUTH_HEADER: &str = "Missing or invalid authorization header";
pub const ERR_COULD_NOT_VALIDATE: &str = "Could not validate credentials";
pub const ERR_INVALID_SCOPE: &str = "Invalid scope for token";
pub const ERR_INVALID_REFRESH_TOKEN: &str = "Invalid refresh token";
pub const ERR_INVALID_EMAIL: &str = "Invalid email";
pub const ERR_INVALID_PASSWORD: &str = "Invalid password";
pub const ERR_EMAIL_NOT_CONFIRMED: &str = "Email not confirmed";
pub const ERR_INVALID_EMAIL_TOKEN: &str = "Invalid token for email verification";
pub const ERR_VERIFICATION: &str = "Verification error";

// User errors
pub const ERR_ACCOUNT_EXISTS: &str = "Account already exists";
pub const ERR_FAILED_FETCH_USER: &str = "Failed to fetch updated user";

// Contact errors
pub const ERR_NOT_FOUND: &str = "Not found";
pub const ERR_CONTACT_EMAIL_EXISTS: &str = "Email already registered";
pub const ERR_INVALID_CONTACT_ID: &str = "Invalid contact ID format";

// Access errors
pub const ERR_BANNED: &str = "You are banned";

// Database errors
pub const ERR_DATABASE_MISCONFIGURED: &str = "Database is not configured correctly";
pub const ERR_DATABASE_CONNECTION: &str = "Error connecting to the database";

// Validation errors
pub const ERR_INVALID_FILE_TYPE: &str =
    "Invalid file type. Only JPEG, PNG, GIF, and WebP are allowed.";
pub const ERR_FILE_TOO_LARGE: &str = "File too large. Maximum size is 5MB.";
pub const ERR_NO_AVATAR_FILE: &str =
    "No avatar file provided. Please upload a file with field name 'file'.";
pub const ERR_FAILED_PROCESS_UPLOAD: &str = "Failed to process upload";
pub const ERR_FAILED_READ_FILE: &str = "Failed to read file data";
pub const ERR_FAILED_SAVE_FILE: &str = "Failed to save file";
pub const ERR_AVATAR_HOST_FAILED: &str = "Avatar hosting service rejected the upload";
pub const ERR_INVALID_PHONE: &str =
    "Phone may only contain digits, spaces, and the characters + - ( )";
