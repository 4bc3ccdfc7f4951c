//! Response models for API endpoints.

pub mod api;
pub mod contact;
pub mod user;

pub use api::*;
pub use contact::*;
pub use user::*;
