//! In-memory stores guarded by `tokio::sync::RwLock`.
//!
//! They mirror the MySQL behaviour the handlers rely on: unique device IPs,
//! unique upload uuids, newest-first ordering and substring search.

use async_trait::async_trait;
use chrono::Utc;
use setcrm_core::heartbeat::HeartbeatObservation;
use setcrm_core::types::{DbId, Timestamp};
use tokio::sync::RwLock;

use super::{
    DeviceStore, HeartbeatStore, RecordingStore, StoreError, StoreResult, VoiceUploadStore,
    DUPLICATE_DEVICE_IP,
};
use crate::models::device::{CreateDevice, DeviceMapping, UpdateDevice};
use crate::models::recording::{RecordingFilter, RecordingHistory};
use crate::models::voice_upload::{CreateVoiceUpload, VoiceUpload};

/// Case-insensitive substring match; an absent or blank term matches everything.
fn contains(haystack: &str, term: Option<&str>) -> bool {
    match term.map(str::trim).filter(|t| !t.is_empty()) {
        Some(term) => haystack.to_lowercase().contains(&term.to_lowercase()),
        None => true,
    }
}

/// Slice `items` the way `LIMIT ? OFFSET ?` would.
fn page<T: Clone>(items: &[T], limit: i64, offset: i64) -> Vec<T> {
    let offset = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
    let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
    items.iter().skip(offset).take(limit).cloned().collect()
}

// ---------------------------------------------------------------------------
// Heartbeats
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryHeartbeatStore {
    log: RwLock<Vec<HeartbeatObservation>>,
}

impl MemoryHeartbeatStore {
    pub fn with_observations(observations: Vec<HeartbeatObservation>) -> Self {
        Self {
            log: RwLock::new(observations),
        }
    }
}

#[async_trait]
impl HeartbeatStore for MemoryHeartbeatStore {
    async fn insert(&self, observation: HeartbeatObservation) -> StoreResult<()> {
        self.log.write().await.push(observation);
        Ok(())
    }

    /// The full log in insertion order.
    async fn latest_snapshot(&self) -> StoreResult<Vec<HeartbeatObservation>> {
        Ok(self.log.read().await.clone())
    }

    async fn delete_older_than(&self, cutoff: Timestamp) -> StoreResult<u64> {
        let mut log = self.log.write().await;
        let before = log.len();
        log.retain(|obs| obs.observed_at >= cutoff);
        Ok((before - log.len()) as u64)
    }
}

// ---------------------------------------------------------------------------
// Devices
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct DeviceTable {
    rows: Vec<DeviceMapping>,
    next_id: DbId,
}

#[derive(Debug, Default)]
pub struct MemoryDeviceStore {
    table: RwLock<DeviceTable>,
}

impl MemoryDeviceStore {
    pub fn with_devices(rows: Vec<DeviceMapping>) -> Self {
        let next_id = rows.iter().map(|d| d.id).max().unwrap_or(0);
        Self {
            table: RwLock::new(DeviceTable { rows, next_id }),
        }
    }
}

#[async_trait]
impl DeviceStore for MemoryDeviceStore {
    async fn list(&self, search: Option<&str>) -> StoreResult<Vec<DeviceMapping>> {
        let table = self.table.read().await;
        let mut rows: Vec<DeviceMapping> = table
            .rows
            .iter()
            .filter(|d| contains(&d.ip_address, search) || contains(&d.device_name, search))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_on.cmp(&a.created_on).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<DeviceMapping>> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|d| d.id == id).cloned())
    }

    async fn find_by_ip(&self, ip_address: &str) -> StoreResult<Option<DeviceMapping>> {
        let table = self.table.read().await;
        let found = table.rows.iter().find(|d| d.ip_address == ip_address);
        Ok(found.cloned())
    }

    async fn create(&self, input: &CreateDevice) -> StoreResult<DeviceMapping> {
        let mut table = self.table.write().await;
        if table.rows.iter().any(|d| d.ip_address == input.ip_address) {
            return Err(StoreError::Duplicate(DUPLICATE_DEVICE_IP.to_string()));
        }
        table.next_id += 1;
        let device = DeviceMapping {
            id: table.next_id,
            ip_address: input.ip_address.clone(),
            device_name: input.device_name.clone(),
            created_on: Utc::now(),
        };
        table.rows.push(device.clone());
        Ok(device)
    }

    async fn update(&self, id: DbId, input: &UpdateDevice) -> StoreResult<Option<DeviceMapping>> {
        let mut table = self.table.write().await;
        if !table.rows.iter().any(|d| d.id == id) {
            return Ok(None);
        }
        if let Some(ip) = &input.ip_address {
            if table.rows.iter().any(|d| d.id != id && &d.ip_address == ip) {
                return Err(StoreError::Duplicate(DUPLICATE_DEVICE_IP.to_string()));
            }
        }
        let Some(device) = table.rows.iter_mut().find(|d| d.id == id) else {
            return Ok(None);
        };
        if let Some(ip) = &input.ip_address {
            device.ip_address = ip.clone();
        }
        if let Some(name) = &input.device_name {
            device.device_name = name.clone();
        }
        Ok(Some(device.clone()))
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table.rows.retain(|d| d.id != id);
        Ok(table.rows.len() < before)
    }
}

// ---------------------------------------------------------------------------
// Recordings
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryRecordingStore {
    rows: RwLock<Vec<RecordingHistory>>,
}

impl MemoryRecordingStore {
    pub fn with_recordings(rows: Vec<RecordingHistory>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }
}

#[async_trait]
impl RecordingStore for MemoryRecordingStore {
    async fn search(
        &self,
        filter: &RecordingFilter,
        limit: i64,
        offset: i64,
    ) -> StoreResult<(Vec<RecordingHistory>, i64)> {
        let rows = self.rows.read().await;
        let mut matches: Vec<RecordingHistory> = rows
            .iter()
            .filter(|r| contains(&r.cnic, filter.search.as_deref()))
            .filter(|r| filter.status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.start_time.cmp(&a.start_time).then(b.id.cmp(&a.id)));
        let total = matches.len() as i64;
        Ok((page(&matches, limit, offset), total))
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<RecordingHistory>> {
        Ok(self.rows.read().await.iter().find(|r| r.id == id).cloned())
    }
}

// ---------------------------------------------------------------------------
// Voice uploads
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryVoiceUploadStore {
    rows: RwLock<Vec<VoiceUpload>>,
}

#[async_trait]
impl VoiceUploadStore for MemoryVoiceUploadStore {
    async fn create(&self, input: &CreateVoiceUpload) -> StoreResult<VoiceUpload> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|u| u.uuid == input.uuid) {
            return Err(StoreError::Duplicate(
                "An upload with this uuid already exists".to_string(),
            ));
        }
        let upload = VoiceUpload {
            id: rows.len() as DbId + 1,
            uuid: input.uuid.clone(),
            ip_address: input.ip_address.clone(),
            cnic: input.cnic.clone(),
            start_time: input.start_time,
            end_time: input.end_time,
            file_name: input.file_name.clone(),
            file_path: input.file_path.clone(),
            file_size: input.file_size,
            created_on: input.created_on,
        };
        rows.push(upload.clone());
        Ok(upload)
    }

    async fn find_by_uuid(&self, uuid: &str) -> StoreResult<Option<VoiceUpload>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|u| u.uuid == uuid).cloned())
    }

    async fn search(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> StoreResult<(Vec<VoiceUpload>, i64)> {
        let rows = self.rows.read().await;
        let mut matches: Vec<VoiceUpload> = rows
            .iter()
            .filter(|u| contains(&u.cnic, search))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_on.cmp(&a.created_on).then(b.id.cmp(&a.id)));
        let total = matches.len() as i64;
        Ok((page(&matches, limit, offset), total))
    }
}
