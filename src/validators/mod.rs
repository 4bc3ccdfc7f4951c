//! Input validation helpers.

pub mod common;
pub mod contact;

pub use common::*;
pub use contact::*;
