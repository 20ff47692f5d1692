//! MySQL-backed stores. Each wraps a pool and delegates to a repository.

use async_trait::async_trait;
use setcrm_core::heartbeat::HeartbeatObservation;
use setcrm_core::types::{DbId, Timestamp};

use super::{DeviceStore, HeartbeatStore, RecordingStore, StoreResult, VoiceUploadStore};
use crate::models::device::{CreateDevice, DeviceMapping, UpdateDevice};
use crate::models::recording::{RecordingFilter, RecordingHistory};
use crate::models::voice_upload::{CreateVoiceUpload, VoiceUpload};
use crate::repositories::{DeviceRepo, HeartbeatRepo, RecordingRepo, VoiceUploadRepo};
use crate::DbPool;

macro_rules! pool_store {
    ($name:ident) => {
        #[derive(Debug, Clone)]
        pub struct $name {
            pool: DbPool,
        }

        impl $name {
            pub fn new(pool: DbPool) -> Self {
                Self { pool }
            }
        }
    };
}

pool_store!(MySqlHeartbeatStore);
pool_store!(MySqlDeviceStore);
pool_store!(MySqlRecordingStore);
pool_store!(MySqlVoiceUploadStore);

#[async_trait]
impl HeartbeatStore for MySqlHeartbeatStore {
    async fn insert(&self, observation: HeartbeatObservation) -> StoreResult<()> {
        Ok(HeartbeatRepo::insert(&self.pool, &observation).await?)
    }

    async fn latest_snapshot(&self) -> StoreResult<Vec<HeartbeatObservation>> {
        Ok(HeartbeatRepo::latest_per_device(&self.pool).await?)
    }

    async fn delete_older_than(&self, cutoff: Timestamp) -> StoreResult<u64> {
        Ok(HeartbeatRepo::delete_older_than(&self.pool, cutoff).await?)
    }
}

#[async_trait]
impl DeviceStore for MySqlDeviceStore {
    async fn list(&self, search: Option<&str>) -> StoreResult<Vec<DeviceMapping>> {
        Ok(DeviceRepo::list(&self.pool, search).await?)
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<DeviceMapping>> {
        Ok(DeviceRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_by_ip(&self, ip_address: &str) -> StoreResult<Option<DeviceMapping>> {
        Ok(DeviceRepo::find_by_ip(&self.pool, ip_address).await?)
    }

    async fn create(&self, input: &CreateDevice) -> StoreResult<DeviceMapping> {
        Ok(DeviceRepo::create(&self.pool, input).await?)
    }

    async fn update(&self, id: DbId, input: &UpdateDevice) -> StoreResult<Option<DeviceMapping>> {
        Ok(DeviceRepo::update(&self.pool, id, input).await?)
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        Ok(DeviceRepo::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl RecordingStore for MySqlRecordingStore {
    async fn search(
        &self,
        filter: &RecordingFilter,
        limit: i64,
        offset: i64,
    ) -> StoreResult<(Vec<RecordingHistory>, i64)> {
        let page = RecordingRepo::search(&self.pool, filter, limit, offset).await?;
        Ok(page)
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<RecordingHistory>> {
        Ok(RecordingRepo::find_by_id(&self.pool, id).await?)
    }
}

#[async_trait]
impl VoiceUploadStore for MySqlVoiceUploadStore {
    async fn create(&self, input: &CreateVoiceUpload) -> StoreResult<VoiceUpload> {
        Ok(VoiceUploadRepo::create(&self.pool, input).await?)
    }

    async fn find_by_uuid(&self, uuid: &str) -> StoreResult<Option<VoiceUpload>> {
        Ok(VoiceUploadRepo::find_by_uuid(&self.pool, uuid).await?)
    }

    async fn search(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> StoreResult<(Vec<VoiceUpload>, i64)> {
        let page = VoiceUploadRepo::search(&self.pool, search, limit, offset).await?;
        Ok(page)
    }
}
