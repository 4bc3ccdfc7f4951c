//! Services organized by domain concern.

pub mod auth_service;
pub mod avatar_service;
pub mod contact_service;
pub mod mail_service;
pub mod token_blacklist;
pub mod user_cache;

pub use auth_service::{AuthService, JwtKeys};
pub use avatar_service::AvatarService;
pub use contact_service::ContactService;
pub use mail_service::MailService;
pub use token_blacklist::TokenBlacklist;
pub use user_cache::UserCache;
