//! telemetry/mod.rs
//! Codec and RPC counters plus an immutable, serializable snapshot.
//!
//! Notes:
//! - Counters are plain `u64` fields owned by the caller; one instance per
//!   client or per decode loop, merged afterwards with `+=`.
//! - The snapshot adds derived values and is what gets exported as JSON.

pub mod counters;
pub mod snapshot;

pub use counters::*;
pub use snapshot::*;
