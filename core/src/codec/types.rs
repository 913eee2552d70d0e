//! codec/types.rs
//! Codec error type and per-call decode statistics.

use thiserror::Error;

use crate::protocol::ProtocolError;
use crate::schema::{TypeDesc, WireType};

#[derive(Debug, Error)]
pub enum CodecError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A present value does not have the declared shape. Bytes already
    /// written for the record are not retracted.
    #[error("bad type in structure: {record}.{field} expects {expected}, value is {found}")]
    BadType {
        record: &'static str,
        field: &'static str,
        expected: TypeDesc,
        found: WireType,
    },

    /// Nested struct value of the wrong record type.
    #[error("bad type in structure: {record}.{field} expects {expected}, value is {found}")]
    WrongRecord {
        record: &'static str,
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("record {record}: required fields not set: {}", .fields.join(", "))]
    MissingRequired {
        record: &'static str,
        fields: Vec<&'static str>,
    },
}

/// Field counts gathered while decoding one top-level record.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DecodeStats {
    /// Fields stored, nested records included.
    pub fields: usize,
    /// Fields consumed by wire tag only.
    pub skipped: usize,
}
