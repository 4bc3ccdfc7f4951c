//! Request models for API endpoints.

pub mod auth;
pub mod contact;

pub use auth::*;
pub use contact::*;
