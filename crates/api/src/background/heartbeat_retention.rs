//! Periodic pruning of old heartbeat observations.
//!
//! Liveness only ever looks at each device's newest observation, so rows
//! older than the retention window can be dropped. Runs on a fixed interval
//! using `tokio::time::interval`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use setcrm_db::store::HeartbeatStore;
use tokio_util::sync::CancellationToken;

/// How often the cleanup job runs.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600);

/// Run the retention loop, deleting observations older than `retention_days`.
/// Runs until `cancel` is triggered.
pub async fn run(
    store: Arc<dyn HeartbeatStore>,
    retention_days: u32,
    cancel: CancellationToken,
) {
    run_every(store, retention_days, CLEANUP_INTERVAL, cancel).await;
}

/// [`run`] with an explicit interval. The first sweep happens immediately.
pub async fn run_every(
    store: Arc<dyn HeartbeatStore>,
    retention_days: u32,
    every: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        retention_days,
        interval_secs = every.as_secs(),
        "Heartbeat retention job started"
    );

    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Heartbeat retention job stopping");
                break;
            }
            _ = interval.tick() => {
                let cutoff = Utc::now() - chrono::Duration::days(i64::from(retention_days));
                match store.delete_older_than(cutoff).await {
                    Ok(deleted) if deleted > 0 => {
                        tracing::info!(deleted, "Heartbeat retention: purged old rows");
                    }
                    Ok(_) => {
                        tracing::debug!("Heartbeat retention: no rows to purge");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Heartbeat retention: cleanup failed");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use setcrm_core::heartbeat::HeartbeatObservation;
    use setcrm_db::store::MemoryHeartbeatStore;

    use super::*;

    fn observation(days_ago: i64) -> HeartbeatObservation {
        HeartbeatObservation {
            device_id: format!("cam-{days_ago}"),
            network_address: "10.0.0.1".to_string(),
            observed_at: Utc::now() - chrono::Duration::days(days_ago),
        }
    }

    #[tokio::test]
    async fn first_sweep_purges_and_cancel_stops_the_loop() {
        let seeded = vec![observation(10), observation(0)];
        let store: Arc<dyn HeartbeatStore> =
            Arc::new(MemoryHeartbeatStore::with_observations(seeded));
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(run_every(
            Arc::clone(&store),
            7,
            Duration::from_secs(3600),
            cancel.clone(),
        ));

        // The first tick fires immediately; wait for it to land.
        for _ in 0..50 {
            if store.latest_snapshot().await.unwrap().len() == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(store.latest_snapshot().await.unwrap().len(), 1);

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("retention task did not stop")
            .unwrap();
    }
}
