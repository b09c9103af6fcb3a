//! Path parameter parsing

use premium_core::Snowflake;

use crate::response::ApiError;

/// Leaderboard size used when the path value is not a number
pub const DEFAULT_LEADERBOARD_LIMIT: u32 = 10;

/// Parse a snowflake path segment, naming the parameter on failure
pub fn parse_snowflake(raw: &str, name: &str) -> Result<Snowflake, ApiError> {
    Snowflake::parse(raw).map_err(|_| ApiError::invalid_path(format!("Invalid {name} format")))
}

/// Leaderboard limit from a path segment; unparseable values fall back to
/// the default, zero is passed through for the service to reject.
pub fn leaderboard_limit(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
}
