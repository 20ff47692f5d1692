//! Field validators shared by request DTOs.
//!
//! The functions returning [`ValidationError`] plug into `#[derive(Validate)]`
//! via `#[validate(custom(function = "..."))]`. Blank values pass the format
//! validators so a missing field reports only "is required".

use std::net::IpAddr;

use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationError};

use crate::error::CoreError;

/// Error code emitted by [`not_blank`].
pub const CODE_REQUIRED: &str = "required";

/// Error code emitted by [`ip_address`].
pub const CODE_IP_ADDRESS: &str = "ip_address";

/// Reject empty or whitespace-only strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(CODE_REQUIRED));
    }
    Ok(())
}

/// Require a non-blank textual IPv4 or IPv6 address (surrounding whitespace allowed).
pub fn ip_address(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    if value.trim().parse::<IpAddr>().is_err() {
        return Err(ValidationError::new(CODE_IP_ADDRESS));
    }
    Ok(())
}

/// Deserialize a string field, treating JSON `null` the same as an absent
/// field so both are reported as "is required" by [`not_blank`].
pub fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

/// Run derive-based validation and convert failures into [`CoreError::Validation`].
pub fn validate<T: Validate>(input: &T) -> Result<(), CoreError> {
    input.validate().map_err(CoreError::from)
}

/// Function-style check for values that do not come through a DTO
/// (e.g. multipart form fields).
pub fn validate_ip_address(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().parse::<IpAddr>().is_err() {
        return Err(CoreError::Validation(format!(
            "{field} must be a valid IPv4 or IPv6 address"
        )));
    }
    Ok(())
}
