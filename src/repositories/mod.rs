//! Repository layer for database operations.
//!
//! Services talk to storage only through these traits, so handlers can be
//! exercised against in-memory implementations.

pub mod contact_repository;
pub mod user_repository;

pub use contact_repository::{ContactRepository, MongoContactRepository};
pub use user_repository::{MongoUserRepository, UserRepository};

/// MongoDB reports unique index violations with this server error code.
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Check whether a driver error is a unique index violation.
pub(crate) fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}
