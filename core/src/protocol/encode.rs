//! protocol/encode.rs
//!
//! Binary protocol writer.
//!
//! Layout:
//!
//! ```text
//! message (strict)  [ 0x8001_00tt : i32 ][ name : string ][ seqid : i32 ]
//! field header      [ tag : u8 ][ id : i16 ]
//! stop              [ 0x00 ]
//! list / set        [ elem tag : u8 ][ count : i32 ]
//! map               [ key tag : u8 ][ value tag : u8 ][ count : i32 ]
//! string / binary   [ len : i32 ][ bytes ]
//! ```

use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};

use crate::constants::VERSION_1;
use crate::protocol::types::{
    ListHeader, MapHeader, MessageHeader, ProtocolError, SizeKind, WireWriter,
};
use crate::schema::WireType;

/// Thrift binary protocol over any `Write`.
#[derive(Debug)]
pub struct BinaryWriter<W> {
    inner: W,
    strict_write: bool,
    bytes_written: u64,
}

impl<W: Write> BinaryWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, strict_write: true, bytes_written: 0 }
    }

    /// Emit versioned message headers (default) or the pre-versioned form.
    pub fn strict_write(mut self, strict: bool) -> Self {
        self.strict_write = strict;
        self
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn put_tag(&mut self, tag: WireType) -> Result<usize, ProtocolError> {
        self.inner.write_u8(tag.to_u8())?;
        self.bytes_written += 1;
        Ok(1)
    }

    fn put_size(&mut self, size: usize, kind: SizeKind) -> Result<usize, ProtocolError> {
        let raw = i32::try_from(size).map_err(|_| ProtocolError::SizeLimit {
            kind,
            size,
            limit: i32::MAX as usize,
        })?;
        self.write_i32(raw)
    }
}

impl<W: Write> WireWriter for BinaryWriter<W> {
    fn write_message_begin(&mut self, header: &MessageHeader) -> Result<usize, ProtocolError> {
        let mut n = 0;
        if self.strict_write {
            let word = VERSION_1 | header.message_type as u32;
            n += self.write_i32(word as i32)?;
            n += self.write_string(&header.name)?;
        } else {
            n += self.write_string(&header.name)?;
            n += self.write_byte(header.message_type as i8)?;
        }
        n += self.write_i32(header.sequence_id)?;
        Ok(n)
    }

    fn write_message_end(&mut self) -> Result<usize, ProtocolError> {
        Ok(0)
    }

    fn write_struct_begin(&mut self, _name: &str) -> Result<usize, ProtocolError> {
        Ok(0)
    }

    fn write_struct_end(&mut self) -> Result<usize, ProtocolError> {
        Ok(0)
    }

    fn write_field_begin(&mut self, _name: &str, wire_type: WireType, id: i16) -> Result<usize, ProtocolError> {
        let n = self.put_tag(wire_type)?;
        Ok(n + self.write_i16(id)?)
    }

    fn write_field_end(&mut self) -> Result<usize, ProtocolError> {
        Ok(0)
    }

    fn write_field_stop(&mut self) -> Result<usize, ProtocolError> {
        self.put_tag(WireType::Stop)
    }

    fn write_list_begin(&mut self, header: &ListHeader) -> Result<usize, ProtocolError> {
        let n = self.put_tag(header.element_type)?;
        Ok(n + self.put_size(header.size, SizeKind::Container)?)
    }

    fn write_list_end(&mut self) -> Result<usize, ProtocolError> {
        Ok(0)
    }

    fn write_set_begin(&mut self, header: &ListHeader) -> Result<usize, ProtocolError> {
        self.write_list_begin(header)
    }

    fn write_set_end(&mut self) -> Result<usize, ProtocolError> {
        Ok(0)
    }

    fn write_map_begin(&mut self, header: &MapHeader) -> Result<usize, ProtocolError> {
        let mut n = self.put_tag(header.key_type)?;
        n += self.put_tag(header.value_type)?;
        Ok(n + self.put_size(header.size, SizeKind::Container)?)
    }

    fn write_map_end(&mut self) -> Result<usize, ProtocolError> {
        Ok(0)
    }

    fn write_bool(&mut self, v: bool) -> Result<usize, ProtocolError> {
        self.write_byte(if v { 1 } else { 0 })
    }

    fn write_byte(&mut self, v: i8) -> Result<usize, ProtocolError> {
        self.inner.write_i8(v)?;
        self.bytes_written += 1;
        Ok(1)
    }

    fn write_i16(&mut self, v: i16) -> Result<usize, ProtocolError> {
        self.inner.write_i16::<BigEndian>(v)?;
        self.bytes_written += 2;
        Ok(2)
    }

    fn write_i32(&mut self, v: i32) -> Result<usize, ProtocolError> {
        self.inner.write_i32::<BigEndian>(v)?;
        self.bytes_written += 4;
        Ok(4)
    }

    fn write_i64(&mut self, v: i64) -> Result<usize, ProtocolError> {
        self.inner.write_i64::<BigEndian>(v)?;
        self.bytes_written += 8;
        Ok(8)
    }

    fn write_double(&mut self, v: f64) -> Result<usize, ProtocolError> {
        self.inner.write_f64::<BigEndian>(v)?;
        self.bytes_written += 8;
        Ok(8)
    }

    fn write_binary(&mut self, v: &[u8]) -> Result<usize, ProtocolError> {
        let n = self.put_size(v.len(), SizeKind::String)?;
        self.inner.write_all(v)?;
        self.bytes_written += v.len() as u64;
        Ok(n + v.len())
    }

    fn flush(&mut self) -> Result<(), ProtocolError> {
        self.inner.flush()?;
        Ok(())
    }

    fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}
