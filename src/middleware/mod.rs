//! Request middleware: authentication, IP bans and rate limiting.

pub mod auth_helpers;
pub mod auth_middleware;
pub mod banned_ips;
pub mod rate_limiter;
pub mod request_ext;

pub use auth_helpers::{bearer_token, require_user};
pub use auth_middleware::AuthMiddleware;
pub use banned_ips::BannedIps;
pub use rate_limiter::create_rate_limiter_config;
pub use request_ext::RequestExt;
