//! protocol/types.rs
//! Wire reader/writer contracts, header types and protocol errors.
//!
//! Notes:
//! - The traits mirror Thrift's `TProtocol` primitives. The codec is written
//!   against the traits only, so any concrete protocol can sit underneath.
//! - Every writer primitive returns the number of bytes it emitted.
//! - `skip` is schema-independent: it consumes a value using only the tag
//!   found on the wire.

use std::fmt;
use std::io;

use bytes::Bytes;
use num_enum::TryFromPrimitive;
use thiserror::Error;

use crate::constants::{
    message_type_ids, DEFAULT_MAX_CONTAINER_LEN, DEFAULT_MAX_STRING_LEN, DEFAULT_RECURSION_LIMIT,
};
use crate::schema::WireType;
use crate::utils::enum_name_or_hex;

/// RPC envelope message types.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum MessageType {
    Call      = message_type_ids::CALL,
    Reply     = message_type_ids::REPLY,
    Exception = message_type_ids::EXCEPTION,
    Oneway    = message_type_ids::ONEWAY,
}

/// `MessageBegin(name, type, seqid)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHeader {
    pub name: String,
    pub message_type: MessageType,
    pub sequence_id: i32,
}

impl MessageHeader {
    pub fn new(name: impl Into<String>, message_type: MessageType, sequence_id: i32) -> Self {
        Self { name: name.into(), message_type, sequence_id }
    }
}

/// `FieldBegin(type, id)`; a STOP header carries id 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldHeader {
    pub wire_type: WireType,
    pub id: i16,
}

impl FieldHeader {
    pub const fn new(wire_type: WireType, id: i16) -> Self {
        Self { wire_type, id }
    }

    pub const fn stop() -> Self {
        Self { wire_type: WireType::Stop, id: 0 }
    }

    #[inline]
    pub fn is_stop(&self) -> bool {
        self.wire_type == WireType::Stop
    }
}

/// `ListBegin(elementType, count)`, also used for sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListHeader {
    pub element_type: WireType,
    pub size: usize,
}

impl ListHeader {
    pub const fn new(element_type: WireType, size: usize) -> Self {
        Self { element_type, size }
    }
}

/// `MapBegin(keyType, valueType, count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapHeader {
    pub key_type: WireType,
    pub value_type: WireType,
    pub size: usize,
}

impl MapHeader {
    pub const fn new(key_type: WireType, value_type: WireType, size: usize) -> Self {
        Self { key_type, value_type, size }
    }
}

/// Bounds enforced by readers before allocating or recursing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolLimits {
    pub max_string_len: usize,
    pub max_container_len: usize,
    pub recursion_limit: usize,
}

impl Default for ProtocolLimits {
    fn default() -> Self {
        Self {
            max_string_len: DEFAULT_MAX_STRING_LEN,
            max_container_len: DEFAULT_MAX_CONTAINER_LEN,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

/// Size kinds reported by `ProtocolError::SizeLimit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeKind {
    String,
    Container,
}

impl fmt::Display for SizeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeKind::String => f.write_str("string"),
            SizeKind::Container => f.write_str("container"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("unexpected end of stream")]
    UnexpectedEof,

    #[error("I/O error: {0}")]
    Io(io::Error),

    #[error("invalid wire type tag: {}", enum_name_or_hex::<WireType>(*.0))]
    InvalidWireType(u8),

    #[error("invalid message type: {}", enum_name_or_hex::<MessageType>(*.0))]
    InvalidMessageType(u8),

    #[error("bad protocol version word: 0x{0:08x}")]
    BadVersion(u32),

    #[error("missing version in message header (strict read)")]
    MissingVersion,

    #[error("negative size on the wire: {0}")]
    NegativeSize(i32),

    #[error("{kind} size {size} exceeds limit {limit}")]
    SizeLimit { kind: SizeKind, size: usize, limit: usize },

    #[error("nesting depth exceeds limit {0}")]
    DepthLimit(usize),

    #[error("cannot skip a value of wire type {0}")]
    Unskippable(WireType),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl From<io::Error> for ProtocolError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::UnexpectedEof => ProtocolError::UnexpectedEof,
            _ => ProtocolError::Io(e),
        }
    }
}

/// Reading half of a wire protocol.
pub trait WireReader {
    fn read_message_begin(&mut self) -> Result<MessageHeader, ProtocolError>;
    fn read_message_end(&mut self) -> Result<(), ProtocolError>;

    fn read_struct_begin(&mut self) -> Result<(), ProtocolError>;
    fn read_struct_end(&mut self) -> Result<(), ProtocolError>;

    fn read_field_begin(&mut self) -> Result<FieldHeader, ProtocolError>;
    fn read_field_end(&mut self) -> Result<(), ProtocolError>;

    fn read_list_begin(&mut self) -> Result<ListHeader, ProtocolError>;
    fn read_list_end(&mut self) -> Result<(), ProtocolError>;

    fn read_set_begin(&mut self) -> Result<ListHeader, ProtocolError>;
    fn read_set_end(&mut self) -> Result<(), ProtocolError>;

    fn read_map_begin(&mut self) -> Result<MapHeader, ProtocolError>;
    fn read_map_end(&mut self) -> Result<(), ProtocolError>;

    fn read_bool(&mut self) -> Result<bool, ProtocolError>;
    fn read_byte(&mut self) -> Result<i8, ProtocolError>;
    fn read_i16(&mut self) -> Result<i16, ProtocolError>;
    fn read_i32(&mut self) -> Result<i32, ProtocolError>;
    fn read_i64(&mut self) -> Result<i64, ProtocolError>;
    fn read_double(&mut self) -> Result<f64, ProtocolError>;
    fn read_binary(&mut self) -> Result<Bytes, ProtocolError>;

    fn read_string(&mut self) -> Result<String, ProtocolError> {
        let raw = self.read_binary()?;
        String::from_utf8(raw.to_vec())
            .map_err(|e| ProtocolError::InvalidData(format!("string is not UTF-8: {}", e)))
    }

    fn limits(&self) -> &ProtocolLimits;

    /// Bytes consumed from the underlying transport so far.
    fn bytes_read(&self) -> u64;

    /// Consume one value of `wire_type` without a schema.
    fn skip(&mut self, wire_type: WireType) -> Result<(), ProtocolError> {
        skip_value(self, wire_type, 0)
    }
}

/// Writing half of a wire protocol.
pub trait WireWriter {
    fn write_message_begin(&mut self, header: &MessageHeader) -> Result<usize, ProtocolError>;
    fn write_message_end(&mut self) -> Result<usize, ProtocolError>;

    fn write_struct_begin(&mut self, name: &str) -> Result<usize, ProtocolError>;
    fn write_struct_end(&mut self) -> Result<usize, ProtocolError>;

    fn write_field_begin(&mut self, name: &str, wire_type: WireType, id: i16) -> Result<usize, ProtocolError>;
    fn write_field_end(&mut self) -> Result<usize, ProtocolError>;
    fn write_field_stop(&mut self) -> Result<usize, ProtocolError>;

    fn write_list_begin(&mut self, header: &ListHeader) -> Result<usize, ProtocolError>;
    fn write_list_end(&mut self) -> Result<usize, ProtocolError>;

    fn write_set_begin(&mut self, header: &ListHeader) -> Result<usize, ProtocolError>;
    fn write_set_end(&mut self) -> Result<usize, ProtocolError>;

    fn write_map_begin(&mut self, header: &MapHeader) -> Result<usize, ProtocolError>;
    fn write_map_end(&mut self) -> Result<usize, ProtocolError>;

    fn write_bool(&mut self, v: bool) -> Result<usize, ProtocolError>;
    fn write_byte(&mut self, v: i8) -> Result<usize, ProtocolError>;
    fn write_i16(&mut self, v: i16) -> Result<usize, ProtocolError>;
    fn write_i32(&mut self, v: i32) -> Result<usize, ProtocolError>;
    fn write_i64(&mut self, v: i64) -> Result<usize, ProtocolError>;
    fn write_double(&mut self, v: f64) -> Result<usize, ProtocolError>;
    fn write_binary(&mut self, v: &[u8]) -> Result<usize, ProtocolError>;

    fn write_string(&mut self, v: &str) -> Result<usize, ProtocolError> {
        self.write_binary(v.as_bytes())
    }

    /// Push buffered bytes to the transport.
    fn flush(&mut self) -> Result<(), ProtocolError>;

    fn bytes_written(&self) -> u64;
}

fn skip_value<R: WireReader + ?Sized>(r: &mut R, wire_type: WireType, depth: usize) -> Result<(), ProtocolError> {
    let limit = r.limits().recursion_limit;
    if depth >= limit {
        return Err(ProtocolError::DepthLimit(limit));
    }

    match wire_type {
        WireType::Bool => r.read_bool().map(drop),
        WireType::Byte => r.read_byte().map(drop),
        WireType::I16 => r.read_i16().map(drop),
        WireType::I32 => r.read_i32().map(drop),
        WireType::I64 => r.read_i64().map(drop),
        WireType::Double => r.read_double().map(drop),
        WireType::String => r.read_binary().map(drop),
        WireType::Struct => {
            r.read_struct_begin()?;
            loop {
                let field = r.read_field_begin()?;
                if field.is_stop() {
                    break;
                }
                skip_value(r, field.wire_type, depth + 1)?;
                r.read_field_end()?;
            }
            r.read_struct_end()
        }
        WireType::List => {
            let header = r.read_list_begin()?;
            for _ in 0..header.size {
                skip_value(r, header.element_type, depth + 1)?;
            }
            r.read_list_end()
        }
        WireType::Set => {
            let header = r.read_set_begin()?;
            for _ in 0..header.size {
                skip_value(r, header.element_type, depth + 1)?;
            }
            r.read_set_end()
        }
        WireType::Map => {
            let header = r.read_map_begin()?;
            for _ in 0..header.size {
                skip_value(r, header.key_type, depth + 1)?;
                skip_value(r, header.value_type, depth + 1)?;
            }
            r.read_map_end()
        }
        WireType::Stop | WireType::Void => Err(ProtocolError::Unskippable(wire_type)),
    }
}
