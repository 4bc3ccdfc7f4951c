//! Small helpers shared across layers.

pub mod gravatar;
pub mod log_sanitizer;

pub use gravatar::gravatar_url;
pub use log_sanitizer::mask_email;
