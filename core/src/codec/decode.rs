//! codec/decode.rs
//!
//! Schema-driven record decoding.
//!
//! Design notes:
//! - Dispatch is on the field id found on the wire; table order is irrelevant.
//! - Unknown ids and tags that disagree with the declared type are skipped
//!   using the wire's tag. Neither is an error.
//! - A container field whose element tags disagree with the declaration is
//!   consumed in full and left absent, so the stream stays aligned.
//! - Decoding starts from `Record::empty`: fields missing on the wire stay
//!   absent instead of picking up in-memory defaults.

use std::io::Cursor;

use tracing::{trace, warn};

use crate::codec::types::{CodecError, DecodeStats};
use crate::protocol::{BinaryReader, ProtocolError, WireReader};
use crate::record::{Record, Value};
use crate::schema::{RecordSchema, TypeDesc, WireType};
use crate::telemetry::TelemetryCounters;

/// Upper bound on up-front allocation for a container read from the wire.
const PREALLOC_CAP: usize = 1024;

/// Decode one record of type `schema` from `reader`.
pub fn decode_record<R: WireReader + ?Sized>(
    schema: &'static RecordSchema,
    reader: &mut R,
) -> Result<Record, CodecError> {
    decode_record_stats(schema, reader).map(|(record, _)| record)
}

/// [`decode_record`], also returning field statistics.
pub fn decode_record_stats<R: WireReader + ?Sized>(
    schema: &'static RecordSchema,
    reader: &mut R,
) -> Result<(Record, DecodeStats), CodecError> {
    let mut stats = DecodeStats::default();
    let record = read_record(schema, reader, 0, &mut stats)?;
    Ok((record, stats))
}

/// [`decode_record`], accumulating into `counters`.
pub fn decode_record_with<R: WireReader + ?Sized>(
    schema: &'static RecordSchema,
    reader: &mut R,
    counters: &mut TelemetryCounters,
) -> Result<Record, CodecError> {
    let start = reader.bytes_read();
    let (record, stats) = decode_record_stats(schema, reader)?;
    counters.add_decoded(stats.fields, stats.skipped, reader.bytes_read() - start);
    Ok(record)
}

/// Decode a record from a complete binary-protocol buffer.
pub fn from_bytes(schema: &'static RecordSchema, buf: &[u8]) -> Result<Record, CodecError> {
    let mut reader = BinaryReader::new(Cursor::new(buf));
    decode_record(schema, &mut reader)
}

fn check_depth<R: WireReader + ?Sized>(r: &R, depth: usize) -> Result<(), CodecError> {
    let limit = r.limits().recursion_limit;
    if depth >= limit {
        return Err(ProtocolError::DepthLimit(limit).into());
    }
    Ok(())
}

fn read_record<R: WireReader + ?Sized>(
    schema: &'static RecordSchema,
    r: &mut R,
    depth: usize,
    stats: &mut DecodeStats,
) -> Result<Record, CodecError> {
    check_depth(r, depth)?;

    let mut record = Record::empty(schema);
    r.read_struct_begin()?;

    loop {
        let header = r.read_field_begin()?;
        if header.is_stop() {
            break;
        }

        match schema.field_by_id(header.id) {
            Some((idx, spec)) if spec.wire_type() == header.wire_type => {
                match read_value(&spec.ty, r, depth + 1, stats)? {
                    Some(value) => {
                        record.put_slot(idx, value);
                        stats.fields += 1;
                    }
                    None => {
                        warn!(
                            record = schema.name,
                            field = spec.name,
                            "element types disagree with declared {}; field dropped",
                            spec.ty
                        );
                        stats.skipped += 1;
                    }
                }
            }
            Some((_, spec)) => {
                warn!(
                    record = schema.name,
                    field = spec.name,
                    id = header.id,
                    "wire type {} does not match declared {}; skipping",
                    header.wire_type,
                    spec.ty
                );
                r.skip(header.wire_type)?;
                stats.skipped += 1;
            }
            None => {
                trace!(
                    record = schema.name,
                    id = header.id,
                    wire_type = %header.wire_type,
                    "skipping unknown field"
                );
                r.skip(header.wire_type)?;
                stats.skipped += 1;
            }
        }

        r.read_field_end()?;
    }

    r.read_struct_end()?;
    Ok(record)
}

/// Read a value whose outer tag already matched `ty`.
///
/// `Ok(None)` means the payload was consumed but some element tag inside it
/// did not match the declaration.
fn read_value<R: WireReader + ?Sized>(
    ty: &TypeDesc,
    r: &mut R,
    depth: usize,
    stats: &mut DecodeStats,
) -> Result<Option<Value>, CodecError> {
    let value = match ty {
        TypeDesc::Bool => Value::Bool(r.read_bool()?),
        TypeDesc::Byte => Value::Byte(r.read_byte()?),
        TypeDesc::I16 => Value::I16(r.read_i16()?),
        TypeDesc::I32 => Value::I32(r.read_i32()?),
        TypeDesc::I64 => Value::I64(r.read_i64()?),
        TypeDesc::Double => Value::Double(r.read_double()?),
        TypeDesc::String => Value::Binary(r.read_binary()?),
        TypeDesc::Struct(schema) => Value::Struct(read_record(schema, r, depth, stats)?),
        TypeDesc::List(elem) => {
            check_depth(r, depth)?;
            let header = r.read_list_begin()?;
            let items = read_elements(elem, header.element_type, header.size, r, depth, stats)?;
            r.read_list_end()?;
            match items {
                Some(items) => Value::List(items),
                None => return Ok(None),
            }
        }
        TypeDesc::Set(elem) => {
            check_depth(r, depth)?;
            let header = r.read_set_begin()?;
            let items = read_elements(elem, header.element_type, header.size, r, depth, stats)?;
            r.read_set_end()?;
            match items {
                Some(items) => Value::Set(items),
                None => return Ok(None),
            }
        }
        TypeDesc::Map(key_ty, value_ty) => {
            check_depth(r, depth)?;
            let header = r.read_map_begin()?;
            let entries = read_entries(key_ty, value_ty, header.key_type, header.value_type, header.size, r, depth, stats)?;
            r.read_map_end()?;
            match entries {
                Some(entries) => Value::Map(entries),
                None => return Ok(None),
            }
        }
    };
    Ok(Some(value))
}

/// An empty container's element tag carries no data, so it is not checked.
fn tag_matches(declared: &TypeDesc, wire: WireType, size: usize) -> bool {
    size == 0 || declared.wire_type() == wire
}

fn read_elements<R: WireReader + ?Sized>(
    elem: &TypeDesc,
    wire_elem: WireType,
    size: usize,
    r: &mut R,
    depth: usize,
    stats: &mut DecodeStats,
) -> Result<Option<Vec<Value>>, CodecError> {
    if !tag_matches(elem, wire_elem, size) {
        for _ in 0..size {
            r.skip(wire_elem)?;
        }
        return Ok(None);
    }

    let mut items = Vec::with_capacity(size.min(PREALLOC_CAP));
    let mut intact = true;
    for _ in 0..size {
        match read_value(elem, r, depth + 1, stats)? {
            Some(v) => items.push(v),
            None => intact = false,
        }
    }
    Ok(if intact { Some(items) } else { None })
}

#[allow(clippy::too_many_arguments)]
fn read_entries<R: WireReader + ?Sized>(
    key_ty: &TypeDesc,
    value_ty: &TypeDesc,
    wire_key: WireType,
    wire_value: WireType,
    size: usize,
    r: &mut R,
    depth: usize,
    stats: &mut DecodeStats,
) -> Result<Option<Vec<(Value, Value)>>, CodecError> {
    if !tag_matches(key_ty, wire_key, size) || !tag_matches(value_ty, wire_value, size) {
        for _ in 0..size {
            r.skip(wire_key)?;
            r.skip(wire_value)?;
        }
        return Ok(None);
    }

    let mut entries = Vec::with_capacity(size.min(PREALLOC_CAP));
    let mut intact = true;
    for _ in 0..size {
        let k = read_value(key_ty, r, depth + 1, stats)?;
        let v = read_value(value_ty, r, depth + 1, stats)?;
        match (k, v) {
            (Some(k), Some(v)) => entries.push((k, v)),
            _ => intact = false,
        }
    }
    Ok(if intact { Some(entries) } else { None })
}
