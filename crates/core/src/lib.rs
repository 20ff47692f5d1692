//! Domain logic for the recording-device dashboard.
//!
//! Everything here is pure: no database, filesystem, or network access.
//! The `db` and `api` crates feed data in and map results out.

pub mod error;
pub mod heartbeat;
pub mod liveness;
pub mod pagination;
pub mod recording;
pub mod types;
pub mod upload;
pub mod validation;
