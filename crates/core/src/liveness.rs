//! Device liveness classification and aggregation.
//!
//! Pure logic -- no database access. The caller fetches a snapshot of
//! heartbeat observations from a store and passes it in together with the
//! reference time, so every function here is deterministic for a given input.
//!
//! A device is classified by the minutes elapsed since its most recent
//! observation:
//!
//! | Elapsed minutes        | Status        |
//! |------------------------|---------------|
//! | `m <= 5`               | `online`      |
//! | `5 < m <= 15`          | `problematic` |
//! | `m > 15`               | `offline`     |

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::heartbeat::HeartbeatObservation;
use crate::types::Timestamp;

/// Inclusive upper bound (minutes) of the `online` bucket.
pub const DEFAULT_ONLINE_MAX_MINUTES: f64 = 5.0;

/// Inclusive upper bound (minutes) of the `problematic` bucket.
pub const DEFAULT_PROBLEMATIC_MAX_MINUTES: f64 = 15.0;

const MILLIS_PER_MINUTE: f64 = 60_000.0;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Liveness bucket of a single device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LivenessStatus {
    Online,
    Problematic,
    Offline,
}

impl LivenessStatus {
    pub const ALL: [LivenessStatus; 3] = [
        LivenessStatus::Online,
        LivenessStatus::Problematic,
        LivenessStatus::Offline,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LivenessStatus::Online => "online",
            LivenessStatus::Problematic => "problematic",
            LivenessStatus::Offline => "offline",
        }
    }
}

impl fmt::Display for LivenessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LivenessStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        LivenessStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown liveness status '{wanted}'. Expected one of: online, problematic, offline"
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Bucket boundaries for the classifier. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LivenessThresholds {
    pub online_max_minutes: f64,
    pub problematic_max_minutes: f64,
}

impl Default for LivenessThresholds {
    fn default() -> Self {
        Self {
            online_max_minutes: DEFAULT_ONLINE_MAX_MINUTES,
            problematic_max_minutes: DEFAULT_PROBLEMATIC_MAX_MINUTES,
        }
    }
}

impl LivenessThresholds {
    /// Build thresholds, rejecting non-finite, negative, or inverted bounds.
    pub fn new(online_max_minutes: f64, problematic_max_minutes: f64) -> Result<Self, CoreError> {
        if !online_max_minutes.is_finite() || !problematic_max_minutes.is_finite() {
            return Err(CoreError::Validation(
                "Liveness thresholds must be finite numbers".to_string(),
            ));
        }
        if online_max_minutes < 0.0 {
            return Err(CoreError::Validation(
                "Online threshold must not be negative".to_string(),
            ));
        }
        if online_max_minutes >= problematic_max_minutes {
            return Err(CoreError::Validation(format!(
                "Online threshold ({online_max_minutes}) must be below the problematic threshold ({problematic_max_minutes})"
            )));
        }
        Ok(Self {
            online_max_minutes,
            problematic_max_minutes,
        })
    }

    /// Classify minutes elapsed since the last observation.
    ///
    /// Negative input (observation timestamp in the future) is clamped to
    /// zero. `NaN` falls through every comparison and lands in `Offline`.
    pub fn classify(&self, elapsed_minutes: f64) -> LivenessStatus {
        let minutes = if elapsed_minutes < 0.0 {
            0.0
        } else {
            elapsed_minutes
        };

        if minutes <= self.online_max_minutes {
            LivenessStatus::Online
        } else if minutes <= self.problematic_max_minutes {
            LivenessStatus::Problematic
        } else {
            LivenessStatus::Offline
        }
    }

    /// Classify an elapsed duration at millisecond resolution.
    pub fn classify_elapsed(&self, elapsed: Duration) -> LivenessStatus {
        self.classify(duration_to_minutes(elapsed))
    }
}

/// Classify with the default 5 / 15 minute boundaries.
pub fn classify(elapsed_minutes: f64) -> LivenessStatus {
    LivenessThresholds::default().classify(elapsed_minutes)
}

/// Minutes between `last_seen` and `now`; negative when `last_seen` is ahead.
pub fn elapsed_minutes(last_seen: Timestamp, now: Timestamp) -> f64 {
    duration_to_minutes(now.signed_duration_since(last_seen))
}

fn duration_to_minutes(elapsed: Duration) -> f64 {
    elapsed.num_milliseconds() as f64 / MILLIS_PER_MINUTE
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Derived liveness of one device, computed from its latest observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceLivenessStatus {
    pub device_id: String,
    pub network_address: String,
    pub last_seen: Timestamp,
    pub status: LivenessStatus,
}

/// Per-bucket device counts. `total == online + problematic + offline`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LivenessSummary {
    pub total: u64,
    pub online: u64,
    pub problematic: u64,
    pub offline: u64,
}

impl LivenessSummary {
    /// Count a list of per-device statuses by bucket.
    pub fn from_statuses(statuses: &[DeviceLivenessStatus]) -> Self {
        statuses.iter().fold(Self::default(), |mut summary, s| {
            summary.record(s.status);
            summary
        })
    }

    fn record(&mut self, status: LivenessStatus) {
        self.total += 1;
        match status {
            LivenessStatus::Online => self.online += 1,
            LivenessStatus::Problematic => self.problematic += 1,
            LivenessStatus::Offline => self.offline += 1,
        }
    }
}

/// Per-device statuses using the default thresholds.
pub fn list_statuses(
    observations: &[HeartbeatObservation],
    now: Timestamp,
) -> Vec<DeviceLivenessStatus> {
    list_statuses_with(observations, now, &LivenessThresholds::default())
}

/// One status per distinct device, most recently seen first.
///
/// Devices seen at the same instant are ordered by ascending `device_id`.
pub fn list_statuses_with(
    observations: &[HeartbeatObservation],
    now: Timestamp,
    thresholds: &LivenessThresholds,
) -> Vec<DeviceLivenessStatus> {
    latest_per_device(observations)
        .into_iter()
        .map(|obs| DeviceLivenessStatus {
            device_id: obs.device_id.clone(),
            network_address: obs.network_address.clone(),
            last_seen: obs.observed_at,
            status: thresholds.classify(elapsed_minutes(obs.observed_at, now)),
        })
        .collect()
}

/// Bucket counts using the default thresholds.
pub fn summarize(observations: &[HeartbeatObservation], now: Timestamp) -> LivenessSummary {
    summarize_with(observations, now, &LivenessThresholds::default())
}

/// Bucket counts over the same per-device view that [`list_statuses_with`]
/// returns, so the two can never disagree.
pub fn summarize_with(
    observations: &[HeartbeatObservation],
    now: Timestamp,
    thresholds: &LivenessThresholds,
) -> LivenessSummary {
    LivenessSummary::from_statuses(&list_statuses_with(observations, now, thresholds))
}

/// Select the newest observation for each device.
///
/// On equal `observed_at` the observation later in the input wins, so a
/// store that yields rows in insertion order resolves ties to the last ping.
fn latest_per_device(observations: &[HeartbeatObservation]) -> Vec<&HeartbeatObservation> {
    let mut latest: HashMap<&str, &HeartbeatObservation> = HashMap::new();

    for obs in observations {
        latest
            .entry(obs.device_id.as_str())
            .and_modify(|current| {
                if obs.observed_at >= current.observed_at {
                    *current = obs;
                }
            })
            .or_insert(obs);
    }

    let mut selected: Vec<&HeartbeatObservation> = latest.into_values().collect();
    selected.sort_by(|a, b| {
        b.observed_at
            .cmp(&a.observed_at)
            .then_with(|| a.device_id.cmp(&b.device_id))
    });
    selected
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
