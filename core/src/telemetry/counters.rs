//! telemetry/counters.rs
//! Mutable counters updated by the codec and the RPC client.
//!
//! Summary: plain increments, no atomics. Converted into an immutable
//! `TelemetrySnapshot` when reported.

use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub records_encoded: u64,
    pub records_decoded: u64,
    pub fields_encoded: u64,
    pub fields_decoded: u64,
    pub fields_skipped: u64,
    pub bytes_written: u64,
    pub bytes_read: u64,
    pub calls_sent: u64,
    pub replies_received: u64,
    pub remote_failures: u64,
}

impl TelemetryCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// One top-level record written, `fields` present fields, `bytes` emitted.
    pub fn add_encoded(&mut self, fields: usize, bytes: usize) {
        self.records_encoded += 1;
        self.fields_encoded += fields as u64;
        self.bytes_written += bytes as u64;
    }

    /// One top-level record read.
    ///
    /// - `fields`: fields stored into the record
    /// - `skipped`: fields consumed by wire tag only
    /// - `bytes`: bytes consumed from the reader
    pub fn add_decoded(&mut self, fields: usize, skipped: usize, bytes: u64) {
        self.records_decoded += 1;
        self.fields_decoded += fields as u64;
        self.fields_skipped += skipped as u64;
        self.bytes_read += bytes;
    }

    pub fn add_call(&mut self) {
        self.calls_sent += 1;
    }

    pub fn add_reply(&mut self, remote_failure: bool) {
        self.replies_received += 1;
        if remote_failure {
            self.remote_failures += 1;
        }
    }

    /// Replies still outstanding for two-way calls. Oneway calls count as sent
    /// only, so this is an upper bound when they are mixed in.
    pub fn pending_replies(&self) -> u64 {
        self.calls_sent.saturating_sub(self.replies_received)
    }

    pub fn merge(&mut self, other: &TelemetryCounters) {
        *self += *other;
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.records_encoded  += rhs.records_encoded;
        self.records_decoded  += rhs.records_decoded;
        self.fields_encoded   += rhs.fields_encoded;
        self.fields_decoded   += rhs.fields_decoded;
        self.fields_skipped   += rhs.fields_skipped;

        self.bytes_written    += rhs.bytes_written;
        self.bytes_read       += rhs.bytes_read;

        self.calls_sent       += rhs.calls_sent;
        self.replies_received += rhs.replies_received;
        self.remote_failures  += rhs.remote_failures;
    }
}
