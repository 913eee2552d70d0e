//! protocol/decode.rs
//!
//! Binary protocol reader.
//!
//! Layout notes:
//! - Big-endian integers, i32 length prefix for strings and containers.
//! - Struct/field/list "end" markers carry no bytes in this protocol.
//! - Sizes are checked against `ProtocolLimits` before any allocation.

use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};
use bytes::Bytes;

use crate::constants::{MESSAGE_TYPE_MASK, VERSION_1, VERSION_MASK};
use crate::protocol::types::{
    FieldHeader, ListHeader, MapHeader, MessageHeader, MessageType, ProtocolError, ProtocolLimits,
    SizeKind, WireReader,
};
use crate::schema::WireType;

/// Up-front capacity for a string read; larger payloads grow as they arrive.
const READ_PREALLOC_CAP: usize = 64 * 1024;

/// Thrift binary protocol over any `Read`.
#[derive(Debug)]
pub struct BinaryReader<R> {
    inner: R,
    limits: ProtocolLimits,
    strict_read: bool,
    bytes_read: u64,
}

impl<R: Read> BinaryReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_limits(inner, ProtocolLimits::default())
    }

    pub fn with_limits(inner: R, limits: ProtocolLimits) -> Self {
        Self { inner, limits, strict_read: false, bytes_read: 0 }
    }

    /// Reject message headers without a version word.
    pub fn strict_read(mut self, strict: bool) -> Self {
        self.strict_read = strict;
        self
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn read_tag(&mut self) -> Result<WireType, ProtocolError> {
        let raw = self.inner.read_u8()?;
        self.bytes_read += 1;
        WireType::try_from(raw).map_err(|_| ProtocolError::InvalidWireType(raw))
    }

    fn read_size(&mut self, kind: SizeKind) -> Result<usize, ProtocolError> {
        let raw = self.read_i32()?;
        if raw < 0 {
            return Err(ProtocolError::NegativeSize(raw));
        }
        let size = raw as usize;
        let limit = match kind {
            SizeKind::String => self.limits.max_string_len,
            SizeKind::Container => self.limits.max_container_len,
        };
        if size > limit {
            return Err(ProtocolError::SizeLimit { kind, size, limit });
        }
        Ok(size)
    }

    /// Memory grows with the bytes actually received, not the declared length.
    fn read_exact_bytes(&mut self, len: usize) -> Result<Vec<u8>, ProtocolError> {
        let mut buf = Vec::with_capacity(len.min(READ_PREALLOC_CAP));
        (&mut self.inner).take(len as u64).read_to_end(&mut buf)?;
        self.bytes_read += buf.len() as u64;
        if buf.len() < len {
            return Err(ProtocolError::UnexpectedEof);
        }
        Ok(buf)
    }
}

impl<R: Read> WireReader for BinaryReader<R> {
    fn read_message_begin(&mut self) -> Result<MessageHeader, ProtocolError> {
        let first = self.read_i32()?;

        if first < 0 {
            let word = first as u32;
            if word & VERSION_MASK != VERSION_1 {
                return Err(ProtocolError::BadVersion(word));
            }
            let raw_type = (word & MESSAGE_TYPE_MASK) as u8;
            let message_type = MessageType::try_from(raw_type)
                .map_err(|_| ProtocolError::InvalidMessageType(raw_type))?;
            let name = self.read_string()?;
            let sequence_id = self.read_i32()?;
            return Ok(MessageHeader { name, message_type, sequence_id });
        }

        if self.strict_read {
            return Err(ProtocolError::MissingVersion);
        }

        // Pre-versioned header: the first word is the name length.
        let len = first as usize;
        if len > self.limits.max_string_len {
            return Err(ProtocolError::SizeLimit {
                kind: SizeKind::String,
                size: len,
                limit: self.limits.max_string_len,
            });
        }
        let raw_name = self.read_exact_bytes(len)?;
        let name = String::from_utf8(raw_name)
            .map_err(|e| ProtocolError::InvalidData(format!("method name is not UTF-8: {}", e)))?;
        let raw_type = self.read_byte()? as u8;
        let message_type = MessageType::try_from(raw_type)
            .map_err(|_| ProtocolError::InvalidMessageType(raw_type))?;
        let sequence_id = self.read_i32()?;
        Ok(MessageHeader { name, message_type, sequence_id })
    }

    fn read_message_end(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn read_struct_begin(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn read_struct_end(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn read_field_begin(&mut self) -> Result<FieldHeader, ProtocolError> {
        let wire_type = self.read_tag()?;
        if wire_type == WireType::Stop {
            return Ok(FieldHeader::stop());
        }
        let id = self.read_i16()?;
        Ok(FieldHeader { wire_type, id })
    }

    fn read_field_end(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn read_list_begin(&mut self) -> Result<ListHeader, ProtocolError> {
        let element_type = self.read_tag()?;
        let size = self.read_size(SizeKind::Container)?;
        Ok(ListHeader { element_type, size })
    }

    fn read_list_end(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn read_set_begin(&mut self) -> Result<ListHeader, ProtocolError> {
        self.read_list_begin()
    }

    fn read_set_end(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn read_map_begin(&mut self) -> Result<MapHeader, ProtocolError> {
        let key_type = self.read_tag()?;
        let value_type = self.read_tag()?;
        let size = self.read_size(SizeKind::Container)?;
        Ok(MapHeader { key_type, value_type, size })
    }

    fn read_map_end(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn read_bool(&mut self) -> Result<bool, ProtocolError> {
        Ok(self.read_byte()? != 0)
    }

    fn read_byte(&mut self) -> Result<i8, ProtocolError> {
        let v = self.inner.read_i8()?;
        self.bytes_read += 1;
        Ok(v)
    }

    fn read_i16(&mut self) -> Result<i16, ProtocolError> {
        let v = self.inner.read_i16::<BigEndian>()?;
        self.bytes_read += 2;
        Ok(v)
    }

    fn read_i32(&mut self) -> Result<i32, ProtocolError> {
        let v = self.inner.read_i32::<BigEndian>()?;
        self.bytes_read += 4;
        Ok(v)
    }

    fn read_i64(&mut self) -> Result<i64, ProtocolError> {
        let v = self.inner.read_i64::<BigEndian>()?;
        self.bytes_read += 8;
        Ok(v)
    }

    fn read_double(&mut self) -> Result<f64, ProtocolError> {
        let v = self.inner.read_f64::<BigEndian>()?;
        self.bytes_read += 8;
        Ok(v)
    }

    fn read_binary(&mut self) -> Result<Bytes, ProtocolError> {
        let len = self.read_size(SizeKind::String)?;
        Ok(Bytes::from(self.read_exact_bytes(len)?))
    }

    fn limits(&self) -> &ProtocolLimits {
        &self.limits
    }

    fn bytes_read(&self) -> u64 {
        self.bytes_read
    }
}
