//! Gravatar URL derivation used as the default avatar at signup.

/// Build the Gravatar image URL for an email address.
///
/// The hash is the MD5 of the trimmed, lowercased address.
pub fn gravatar_url(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    let digest = md5::compute(normalized.as_bytes());
    format!("https://www.gravatar.com/avatar/{:x}", digest)
}
