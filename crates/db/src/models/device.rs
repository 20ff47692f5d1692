//! Device registry entity and DTOs.

use serde::{Deserialize, Serialize};
use setcrm_core::types::{DbId, Timestamp};
use setcrm_core::validation;
use sqlx::FromRow;
use validator::Validate;

/// A registered recording device.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct DeviceMapping {
    pub id: DbId,
    pub ip_address: String,
    pub device_name: String,
    pub created_on: Timestamp,
}

/// Body of `POST /devices`. Absent or `null` fields deserialize as empty and
/// fail validation.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateDevice {
    #[serde(default, deserialize_with = "validation::null_as_empty")]
    #[validate(custom(function = "validation::ip_address"))]
    pub ip_address: String,

    #[serde(default, deserialize_with = "validation::null_as_empty")]
    #[validate(
        custom(function = "validation::not_blank"),
        length(max = 255, message = "device_name must not exceed 255 characters")
    )]
    pub device_name: String,
}

impl CreateDevice {
    /// Copy with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            ip_address: self.ip_address.trim().to_string(),
            device_name: self.device_name.trim().to_string(),
        }
    }
}

/// Body of `PUT /devices/{id}`. Only provided fields are applied.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateDevice {
    #[validate(custom(function = "validation::ip_address"))]
    pub ip_address: Option<String>,

    #[validate(
        custom(function = "validation::not_blank"),
        length(max = 255, message = "device_name must not exceed 255 characters")
    )]
    pub device_name: Option<String>,
}

impl UpdateDevice {
    /// Copy with surrounding whitespace removed from every provided field.
    pub fn trimmed(&self) -> Self {
        Self {
            ip_address: self.ip_address.as_deref().map(|s| s.trim().to_string()),
            device_name: self.device_name.as_deref().map(|s| s.trim().to_string()),
        }
    }
}
