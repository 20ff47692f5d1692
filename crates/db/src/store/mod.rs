//! Storage interfaces the HTTP layer is written against.
//!
//! Every table has a trait with two implementations: a MySQL one that
//! delegates to [`crate::repositories`], and an in-memory one used for
//! demos and tests. [`Stores`] bundles one of each kind behind `Arc<dyn _>`.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use setcrm_core::heartbeat::HeartbeatObservation;
use setcrm_core::types::{DbId, Timestamp};

use crate::models::device::{CreateDevice, DeviceMapping, UpdateDevice};
use crate::models::recording::{RecordingFilter, RecordingHistory};
use crate::models::voice_upload::{CreateVoiceUpload, VoiceUpload};
use crate::DbPool;

pub mod memory;
pub mod mysql;
pub mod seed;

pub use memory::{
    MemoryDeviceStore, MemoryHeartbeatStore, MemoryRecordingStore, MemoryVoiceUploadStore,
};
pub use mysql::{MySqlDeviceStore, MySqlHeartbeatStore, MySqlRecordingStore, MySqlVoiceUploadStore};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure of a store operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write. Carries a client-facing message.
    #[error("{0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                // MySQL names the key only in the message: "Duplicate entry '..' for key '..'".
                let detail = db_err.constraint().unwrap_or_else(|| db_err.message());
                tracing::debug!(detail, "Unique constraint violated");
                return StoreError::Duplicate(duplicate_message(detail));
            }
        }
        StoreError::Database(err)
    }
}

/// Client-facing message for a unique-key violation.
fn duplicate_message(detail: &str) -> String {
    if detail.contains("uq_device_mapping_ip_address") {
        DUPLICATE_DEVICE_IP.to_string()
    } else if detail.contains("uq_voice_upload_uuid") {
        "An upload with this uuid already exists".to_string()
    } else {
        "A record with these values already exists".to_string()
    }
}

/// Message returned when a device IP is already registered.
pub const DUPLICATE_DEVICE_IP: &str = "A device with this IP address already exists";

pub type StoreResult<T> = Result<T, StoreError>;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Append-only heartbeat log.
#[async_trait]
pub trait HeartbeatStore: Send + Sync {
    async fn insert(&self, observation: HeartbeatObservation) -> StoreResult<()>;

    /// Observations sufficient to derive every device's latest heartbeat.
    ///
    /// Must contain each device's newest observation. Ties on `observed_at`
    /// are resolved by the aggregator in favour of the later element.
    async fn latest_snapshot(&self) -> StoreResult<Vec<HeartbeatObservation>>;

    /// Remove observations older than `cutoff`, returning how many were removed.
    async fn delete_older_than(&self, cutoff: Timestamp) -> StoreResult<u64>;
}

/// Device registry.
#[async_trait]
pub trait DeviceStore: Send + Sync {
    async fn list(&self, search: Option<&str>) -> StoreResult<Vec<DeviceMapping>>;
    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<DeviceMapping>>;
    async fn find_by_ip(&self, ip_address: &str) -> StoreResult<Option<DeviceMapping>>;
    async fn create(&self, input: &CreateDevice) -> StoreResult<DeviceMapping>;
    async fn update(&self, id: DbId, input: &UpdateDevice) -> StoreResult<Option<DeviceMapping>>;
    async fn delete(&self, id: DbId) -> StoreResult<bool>;
}

/// Read-only recording catalog.
#[async_trait]
pub trait RecordingStore: Send + Sync {
    async fn search(
        &self,
        filter: &RecordingFilter,
        limit: i64,
        offset: i64,
    ) -> StoreResult<(Vec<RecordingHistory>, i64)>;
    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<RecordingHistory>>;
}

/// Voice upload metadata.
#[async_trait]
pub trait VoiceUploadStore: Send + Sync {
    async fn create(&self, input: &CreateVoiceUpload) -> StoreResult<VoiceUpload>;
    async fn find_by_uuid(&self, uuid: &str) -> StoreResult<Option<VoiceUpload>>;
    async fn search(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> StoreResult<(Vec<VoiceUpload>, i64)>;
}

// ---------------------------------------------------------------------------
// Backend selection
// ---------------------------------------------------------------------------

/// Which storage backend a [`Stores`] bundle uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    MySql,
}

impl StoreBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreBackend::Memory => "memory",
            StoreBackend::MySql => "mysql",
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "mysql" => Ok(StoreBackend::MySql),
            other => Err(format!(
                "unknown store backend '{other}' (expected 'memory' or 'mysql')"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

/// One store per table, all from the same backend.
#[derive(Clone)]
pub struct Stores {
    pub backend: StoreBackend,
    pub heartbeats: Arc<dyn HeartbeatStore>,
    pub devices: Arc<dyn DeviceStore>,
    pub recordings: Arc<dyn RecordingStore>,
    pub voice_uploads: Arc<dyn VoiceUploadStore>,
    pool: Option<DbPool>,
}

impl Stores {
    /// MySQL-backed stores sharing `pool`.
    pub fn mysql(pool: DbPool) -> Self {
        Self {
            backend: StoreBackend::MySql,
            heartbeats: Arc::new(MySqlHeartbeatStore::new(pool.clone())),
            devices: Arc::new(MySqlDeviceStore::new(pool.clone())),
            recordings: Arc::new(MySqlRecordingStore::new(pool.clone())),
            voice_uploads: Arc::new(MySqlVoiceUploadStore::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Empty in-memory stores.
    pub fn memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            heartbeats: Arc::new(MemoryHeartbeatStore::default()),
            devices: Arc::new(MemoryDeviceStore::default()),
            recordings: Arc::new(MemoryRecordingStore::default()),
            voice_uploads: Arc::new(MemoryVoiceUploadStore::default()),
            pool: None,
        }
    }

    /// In-memory stores preloaded with demo data relative to `now`.
    pub fn seeded_memory(now: Timestamp) -> Self {
        let heartbeats = MemoryHeartbeatStore::with_observations(seed::heartbeats(now));
        let devices = MemoryDeviceStore::with_devices(seed::devices(now));
        let recordings = MemoryRecordingStore::with_recordings(seed::recordings());
        Self {
            backend: StoreBackend::Memory,
            heartbeats: Arc::new(heartbeats),
            devices: Arc::new(devices),
            recordings: Arc::new(recordings),
            voice_uploads: Arc::new(MemoryVoiceUploadStore::default()),
            pool: None,
        }
    }

    /// The underlying pool, when backed by MySQL.
    pub fn pool(&self) -> Option<&DbPool> {
        self.pool.as_ref()
    }

    /// Whether the backend is reachable. Memory stores are always healthy.
    pub async fn health_check(&self) -> bool {
        match &self.pool {
            Some(pool) => crate::health_check(pool).await.is_ok(),
            None => true,
        }
    }
}

impl fmt::Debug for Stores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stores")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_parses_case_insensitively() {
        let parse = |s: &str| s.parse::<StoreBackend>();
        assert_eq!(parse("MySQL").unwrap(), StoreBackend::MySql);
        assert_eq!(parse(" memory ").unwrap(), StoreBackend::Memory);
        assert!(parse("postgres").is_err());
    }

    #[test]
    fn duplicate_message_names_the_constraint() {
        let mysql_message =
            "Duplicate entry '10.0.0.1' for key 'device_mapping.uq_device_mapping_ip_address'";
        assert_eq!(duplicate_message(mysql_message), DUPLICATE_DEVICE_IP);
        assert_eq!(
            duplicate_message("other"),
            "A record with these values already exists"
        );
    }

    #[test]
    fn non_unique_errors_stay_database_errors() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Database(_)));
    }
}
