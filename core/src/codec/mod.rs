//! Record codec.
//!
//! Responsibilities:
//! - Decode a field stream into a `Record` using its schema
//! - Encode a `Record` into a field stream in table order
//! - Validate required fields when asked to
//!
//! The engine is generic over `WireReader`/`WireWriter`; it holds no state
//! between calls.

pub mod types;
pub mod decode;
pub mod encode;
pub mod validate;

pub use types::{CodecError, DecodeStats};
pub use decode::{decode_record, decode_record_stats, decode_record_with, from_bytes};
pub use encode::{encode_record, encode_record_with, to_bytes};
pub use validate::{missing_required, validate_required};
