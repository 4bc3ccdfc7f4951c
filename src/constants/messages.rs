//! Success message constants used throughout the application.

// General messages
pub const MSG_ROOT: &str = "Notebook API is up";
pub const MSG_DATABASE_OK: &str = "Welcome to Notebook API!";

// Authentication messages
pub const MSG_USER_CREATED: &str = "User successfully created. Check your email for confirmation.";
pub const MSG_EMAIL_CONFIRMED: &str = "Email confirmed";
pub const MSG_EMAIL_ALREADY_CONFIRMED: &str = "Your email is already confirmed";
pub const MSG_CHECK_EMAIL: &str = "Check your email for confirmation.";
pub const MSG_LOGOUT_SUCCESS: &str = "Logout successful";

// Mail
pub const MAIL_SUBJECT_CONFIRM: &str = "Confirm your email";

/// Token type returned with every token pair.
pub const TOKEN_TYPE_BEARER: &str = "bearer";
