//! Contact-related custom validators.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

use crate::constants::ERR_INVALID_PHONE;

lazy_static! {
    static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9 ()\-]+$").expect("phone pattern is valid");
}

/// Custom validator for the phone field.
/// Accepts digits, spaces, parentheses, dashes and a leading plus sign.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_REGEX.is_match(phone.trim()) && phone.chars().any(|c| c.is_ascii_digit()) {
        return Ok(());
    }
    let mut error = ValidationError::new("invalid_phone");
    error.message = Some(ERR_INVALID_PHONE.into());
    Err(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_phone_formats() {
        assert!(validate_phone("+380501234567").is_ok());
        assert!(validate_phone("(050) 123-45-67").is_ok());
        assert!(validate_phone("050 123 4567").is_ok());
    }

    #[test]
    fn rejects_letters_and_symbol_only_values() {
        assert!(validate_phone("call me").is_err());
        assert!(validate_phone("+-()").is_err());
        assert!(validate_phone("12#34").is_err());
    }
}
