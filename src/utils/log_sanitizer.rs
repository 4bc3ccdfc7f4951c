//! Email masking for log lines.
//!
//! Account and contact addresses appear in auth, cache, mail and avatar logs;
//! those call sites log `mask_email(..)` instead of the raw address.

const VISIBLE_CHARS: usize = 3;

/// Keep the first few characters of the local part and the whole domain.
///
/// Counts characters, not bytes, so non-ASCII addresses are safe to mask.
///
/// ```ignore
/// assert_eq!(mask_email("jane.doe@example.com"), "jan***@example.com");
/// ```
pub fn mask_email(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}***@{}", visible_prefix(local), domain),
        None => format!("{}***", visible_prefix(email)),
    }
}

fn visible_prefix(value: &str) -> String {
    value.chars().take(VISIBLE_CHARS).collect()
}
