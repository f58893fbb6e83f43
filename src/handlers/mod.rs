pub mod image;
pub mod message;
pub mod stats;

use crate::error::{AppError, Result};

/// Parse a numeric path id, rejecting anything that is not an integer
pub(crate) fn parse_id(raw: &str, invalid_message: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::BadRequest(invalid_message.to_string()))
}
