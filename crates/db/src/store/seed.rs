//! Demo data for `STORE_BACKEND=memory`.

use chrono::{Duration, TimeZone, Utc};
use setcrm_core::heartbeat::HeartbeatObservation;
use setcrm_core::recording::RecordingStatus;
use setcrm_core::types::Timestamp;

use crate::models::device::DeviceMapping;
use crate::models::recording::RecordingHistory;

/// Three registered devices, created one to five days before `now`.
pub fn devices(now: Timestamp) -> Vec<DeviceMapping> {
    [
        (1, "192.168.1.101", "Reception Camera", 2),
        (2, "192.168.1.102", "Main Hall Recorder", 5),
        (3, "192.168.1.103", "Security Camera 1", 1),
    ]
    .into_iter()
    .map(|(id, ip, name, days_ago)| DeviceMapping {
        id,
        ip_address: ip.to_string(),
        device_name: name.to_string(),
        created_on: now - Duration::days(days_ago),
    })
    .collect()
}

/// One heartbeat for each of six devices: two online, two problematic, two offline.
pub fn heartbeats(now: Timestamp) -> Vec<HeartbeatObservation> {
    [2, 8, 17, 25, 3, 6]
        .into_iter()
        .enumerate()
        .map(|(i, minutes_ago)| HeartbeatObservation {
            device_id: format!("device-{:03}", i + 1),
            network_address: format!("192.168.1.{}", 101 + i),
            observed_at: now - Duration::minutes(minutes_ago),
        })
        .collect()
}

/// Five recordings across three devices and every status.
pub fn recordings() -> Vec<RecordingHistory> {
    use RecordingStatus::{Completed, Failed, InProgress};

    // (cnic, January (day, hour, min), minutes, last IP octet, status); ids follow row order.
    let rows: [(&str, (u32, u32, u32), Option<i64>, u8, RecordingStatus); 5] = [
        ("12345-6789012-3", (15, 9, 30), Some(45), 101, Completed),
        ("98765-4321098-7", (15, 11, 0), Some(30), 102, Completed),
        ("11111-2222233-4", (15, 14, 15), None, 103, InProgress),
        ("55555-6666677-8", (14, 16, 45), Some(35), 101, Completed),
        ("12345-6789012-3", (14, 10, 0), Some(10), 102, Failed),
    ];

    rows.into_iter()
        .zip(1..)
        .filter_map(|((cnic, (day, hour, min), minutes, octet, status), id)| {
            let start = Utc.with_ymd_and_hms(2024, 1, day, hour, min, 0).single()?;
            Some(RecordingHistory {
                id,
                cnic: cnic.to_string(),
                start_time: start,
                end_time: minutes.map(|m| start + Duration::minutes(m)),
                file_name: format!("recording_{}.mp4", start.format("%Y%m%d_%H%M%S")),
                created_on: start,
                ip_address: format!("192.168.1.{octet}"),
                duration: minutes.map(|m| m as i32),
                status,
            })
        })
        .collect()
}
