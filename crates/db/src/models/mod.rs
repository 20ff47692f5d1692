//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` create / update DTOs where the API writes the table

pub mod device;
pub mod heartbeat;
pub mod recording;
pub mod voice_upload;
