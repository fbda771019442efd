//! Request handlers

pub mod allocation;
pub mod balances;
pub mod groups;
pub mod health;
pub mod settlement;

use std::str::FromStr;

use crate::error::ApiError;

/// Parses a path identifier, with or without its display prefix
pub(crate) fn parse_id<T: FromStr>(raw: &str, kind: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {} id: {}", kind, raw)))
}
