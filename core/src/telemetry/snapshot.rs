//! telemetry/snapshot.rs
//!
//! Immutable telemetry snapshot with derived ratios, exportable as JSON.

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TelemetryCounters;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub counters: TelemetryCounters,
    /// Skipped fields over all fields seen while decoding.
    pub skip_ratio: f64,
    /// Share of replies that carried a declared exception.
    pub remote_failure_ratio: f64,
    pub avg_bytes_per_record_written: f64,
    pub avg_bytes_per_record_read: f64,
}

fn ratio(num: u64, den: u64) -> f64 {
    if den > 0 {
        num as f64 / den as f64
    } else {
        0.0
    }
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters) -> Self {
        let seen = counters.fields_decoded + counters.fields_skipped;
        Self {
            counters: *counters,
            skip_ratio: ratio(counters.fields_skipped, seen),
            remote_failure_ratio: ratio(counters.remote_failures, counters.replies_received),
            avg_bytes_per_record_written: ratio(counters.bytes_written, counters.records_encoded),
            avg_bytes_per_record_read: ratio(counters.bytes_read, counters.records_decoded),
        }
    }

    /// Ratios stay within [0, 1] and failures never exceed replies.
    pub fn sanity_check(&self) -> bool {
        (0.0..=1.0).contains(&self.skip_ratio)
            && (0.0..=1.0).contains(&self.remote_failure_ratio)
            && self.counters.remote_failures <= self.counters.replies_received
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}
