//! Pagination constants for list endpoints.

/// Default number of items returned when `limit` is not specified.
pub const DEFAULT_LIMIT: u64 = 10;

/// Maximum allowed `limit` to prevent excessive data retrieval.
pub const MAX_LIMIT: u64 = 100;

/// Number of days covered by the upcoming birthdays query.
pub const BIRTHDAY_WINDOW_DAYS: i64 = 7;
